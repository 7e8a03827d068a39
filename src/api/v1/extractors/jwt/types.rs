/*
 * Responsibility
 * - Request extension slots written by the token validation middleware
 * - The accessor (accessor.rs) only ever reads these; nothing downstream mutates them
 *
 * Notes
 * - The slot type *is* the key: one `JwtToken` and one `JwtClaims` per request
 * - Claims are kept as a raw `Value` so a non-object payload can be represented
 *   (accessors treat that shape as absent)
 */
use serde_json::Value;

/// Raw compact JWT as received in `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtToken(pub String);

/// Decoded JWT payload, already verified upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtClaims(pub Value);

/// `aud` as it appears in the claims: a single string or an array of strings
/// (RFC 7519 §4.1.3). Non-string array entries are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimAud<'a> {
    One(&'a str),
    Many(Vec<&'a str>),
}

impl<'a> ClaimAud<'a> {
    pub(crate) fn from_value(v: &'a Value) -> Option<Self> {
        match v {
            Value::String(s) => Some(Self::One(s.as_str())),
            Value::Array(items) => Some(Self::Many(
                items.iter().filter_map(Value::as_str).collect(),
            )),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        let items: &[&'a str] = match self {
            Self::One(s) => std::slice::from_ref(s),
            Self::Many(v) => v,
        };
        items.iter().copied()
    }

    pub fn contains(&self, audience: &str) -> bool {
        self.iter().any(|a| a == audience)
    }

    /// No usable (non-empty) audience value.
    pub fn is_empty(&self) -> bool {
        self.iter().all(str::is_empty)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    /// Same shape as in the claims (string stays a string).
    pub fn to_value(&self) -> Value {
        match self {
            Self::One(s) => Value::String((*s).to_owned()),
            Self::Many(v) => Value::Array(
                v.iter().map(|s| Value::String((*s).to_owned())).collect(),
            ),
        }
    }
}
