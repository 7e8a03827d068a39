//! Read-only access to the JWT data the validation middleware attached to a request.
//!
//! Two families:
//! - `get_*`: never fail, absence is `None`
//! - `require_*`: absence is logged once at ERROR and returned as [`MissingCredential`],
//!   which handlers propagate with `?` (AppError renders it as 401 + bearer challenge)
//!
//! Storage location is decided by `get_token` / `get_claims`. Every other accessor is
//! built on those two, so an implementation that keeps the token somewhere else only
//! needs to override them.

use axum::http::{Extensions, Request, request::Parts};
use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{ClaimAud, JwtClaims, JwtToken};

/// Required JWT data was not present on the request.
///
/// The variant only decides the server-side log line. Every variant maps to the same
/// client-visible 401.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingCredential {
    #[error("No JWT found in request")]
    Token,
    #[error("No JWT claims found in request")]
    Claims,
    #[error("JWT claim '{0}' missing from request")]
    Claim(String),
}

impl MissingCredential {
    fn claim(name: &str) -> Self {
        Self::Claim(name.to_owned())
    }
}

// One ERROR event per failed enforcement.
fn missing(err: MissingCredential) -> MissingCredential {
    tracing::error!("{err}");
    err
}

fn non_empty_str(s: &str) -> bool {
    !s.is_empty()
}

fn present_value(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => non_empty_str(s),
        _ => true,
    }
}

pub trait JwtRequestExt {
    /// The request environment populated by the upstream middleware.
    fn jwt_env(&self) -> &Extensions;

    /// Raw compact JWT, if the middleware stored one.
    fn get_token(&self) -> Option<&str> {
        self.jwt_env().get::<JwtToken>().map(|t| t.0.as_str())
    }

    /// Decoded claims. A payload that is not a JSON object counts as absent.
    fn get_claims(&self) -> Option<&Map<String, Value>> {
        self.jwt_env()
            .get::<JwtClaims>()
            .and_then(|c| c.0.as_object())
    }

    fn get_claim(&self, name: &str) -> Option<&Value> {
        self.get_claims()?.get(name)
    }

    /// `sub` (RFC 7519 §4.1.2). Only string values are returned.
    fn get_claim_sub(&self) -> Option<&str> {
        self.get_claim("sub").and_then(Value::as_str)
    }

    /// `aud` (RFC 7519 §4.1.3), either the single-string or the array form.
    fn get_claim_aud(&self) -> Option<ClaimAud<'_>> {
        self.get_claim("aud").and_then(ClaimAud::from_value)
    }

    fn require_token(&self) -> Result<&str, MissingCredential> {
        self.get_token()
            .filter(|t| non_empty_str(t))
            .ok_or_else(|| missing(MissingCredential::Token))
    }

    /// An empty claims object is still a present mapping.
    fn require_claims(&self) -> Result<&Map<String, Value>, MissingCredential> {
        self.get_claims()
            .ok_or_else(|| missing(MissingCredential::Claims))
    }

    /// `null` and `""` count as missing.
    fn require_claim(&self, name: &str) -> Result<&Value, MissingCredential> {
        self.get_claim(name)
            .filter(|v| present_value(v))
            .ok_or_else(|| missing(MissingCredential::claim(name)))
    }

    fn require_claim_sub(&self) -> Result<&str, MissingCredential> {
        self.get_claim_sub()
            .filter(|s| non_empty_str(s))
            .ok_or_else(|| missing(MissingCredential::claim("sub")))
    }

    /// An array `aud` passes as long as one entry is a non-empty string.
    fn require_claim_aud(&self) -> Result<ClaimAud<'_>, MissingCredential> {
        self.get_claim_aud()
            .filter(|aud| !aud.is_empty())
            .ok_or_else(|| missing(MissingCredential::claim("aud")))
    }
}

impl JwtRequestExt for Extensions {
    fn jwt_env(&self) -> &Extensions {
        self
    }
}

impl JwtRequestExt for Parts {
    fn jwt_env(&self) -> &Extensions {
        &self.extensions
    }
}

impl<B> JwtRequestExt for Request<B> {
    fn jwt_env(&self) -> &Extensions {
        self.extensions()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{self, header};
    use serde_json::json;

    use super::*;
    use crate::test_support::capture_logs;

    fn parts_with(token: Option<&str>, claims: Option<Value>) -> Parts {
        let (mut parts, _body) = http::Request::new(()).into_parts();
        if let Some(token) = token {
            parts.extensions.insert(JwtToken(token.to_string()));
        }
        if let Some(claims) = claims {
            parts.extensions.insert(JwtClaims(claims));
        }
        parts
    }

    fn error_lines(logs: &str) -> Vec<&str> {
        logs.lines().filter(|l| l.contains("ERROR")).collect()
    }

    #[test]
    fn full_context_reads_every_value() {
        let parts = parts_with(
            Some("abc.def.ghi"),
            Some(json!({"sub": "u1", "aud": "svcA"})),
        );

        let (results, logs) = capture_logs(|| {
            (
                parts.get_token(),
                parts.require_claim_sub().map(str::to_owned),
                parts.require_claim_aud(),
            )
        });

        assert_eq!(results.0, Some("abc.def.ghi"));
        assert_eq!(results.1.as_deref(), Ok("u1"));
        assert_eq!(results.2, Ok(ClaimAud::One("svcA")));
        assert!(error_lines(&logs).is_empty());
    }

    #[test]
    fn empty_context_is_absent_and_require_token_logs() {
        let parts = parts_with(None, None);

        assert_eq!(parts.get_token(), None);
        assert_eq!(parts.get_claims(), None);

        let (result, logs) = capture_logs(|| parts.require_token().map(str::to_owned));

        assert_eq!(result, Err(MissingCredential::Token));
        let errors = error_lines(&logs);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("No JWT found in request"));
    }

    #[test]
    fn present_token_is_returned_without_logging() {
        let parts = parts_with(Some("header.payload.sig"), None);

        let (result, logs) = capture_logs(|| parts.require_token().map(str::to_owned));

        assert_eq!(parts.get_token(), Some("header.payload.sig"));
        assert_eq!(result.as_deref(), Ok("header.payload.sig"));
        assert!(logs.is_empty());
    }

    #[test]
    fn empty_token_string_fails_enforcement() {
        let parts = parts_with(Some(""), None);

        assert_eq!(parts.get_token(), Some(""));
        let (result, _logs) = capture_logs(|| parts.require_token().map(str::to_owned));
        assert_eq!(result, Err(MissingCredential::Token));
    }

    #[test]
    fn sub_claim_is_read_from_mapping() {
        let parts = parts_with(None, Some(json!({"sub": "alice"})));

        assert_eq!(parts.get_claim_sub(), Some("alice"));
        let (result, _logs) = capture_logs(|| parts.require_claim_sub().map(str::to_owned));
        assert_eq!(result.as_deref(), Ok("alice"));
    }

    #[test]
    fn non_mapping_claims_are_treated_as_absent() {
        for claims in [json!("just-a-string"), json!(42), json!(["sub", "aud"])] {
            let parts = parts_with(Some("t"), Some(claims));

            assert_eq!(parts.get_claims(), None);
            assert_eq!(parts.get_claim_sub(), None);
            assert_eq!(parts.get_claim_aud(), None);

            let (results, logs) = capture_logs(|| {
                (
                    parts.require_claims().map(|_| ()),
                    parts.require_claim_sub().map(|_| ()),
                    parts.require_claim_aud().map(|_| ()),
                )
            });

            assert_eq!(results.0, Err(MissingCredential::Claims));
            assert_eq!(results.1, Err(MissingCredential::Claim("sub".into())));
            assert_eq!(results.2, Err(MissingCredential::Claim("aud".into())));
            assert_eq!(error_lines(&logs).len(), 3);
        }
    }

    #[test]
    fn accessors_are_independent() {
        let parts = parts_with(None, Some(json!({"sub": "alice"})));

        let (results, logs) = capture_logs(|| {
            (
                parts.require_claim_sub().map(str::to_owned),
                parts.require_claim_aud(),
            )
        });

        assert_eq!(parts.get_claim_aud(), None);
        assert_eq!(results.0.as_deref(), Ok("alice"));
        assert_eq!(results.1, Err(MissingCredential::Claim("aud".into())));

        let errors = error_lines(&logs);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("JWT claim 'aud' missing from request"));
    }

    #[test]
    fn non_string_sub_is_absent() {
        let parts = parts_with(None, Some(json!({"sub": 7, "aud": 7})));

        assert_eq!(parts.get_claim_sub(), None);
        assert_eq!(parts.get_claim_aud(), None);
        assert_eq!(parts.get_claim("sub"), Some(&json!(7)));
    }

    #[test]
    fn array_aud_counts_as_present() {
        let parts = parts_with(None, Some(json!({"sub": "u1", "aud": ["svcA"]})));

        let (result, logs) = capture_logs(|| parts.require_claim_aud());

        assert_eq!(parts.get_claim_aud(), Some(ClaimAud::Many(vec!["svcA"])));
        assert_eq!(result, Ok(ClaimAud::Many(vec!["svcA"])));
        assert!(error_lines(&logs).is_empty());
    }

    #[test]
    fn multi_valued_aud_exposes_every_audience() {
        let parts = parts_with(None, Some(json!({"aud": ["svcA", 3, "svcB"]})));

        let aud = parts.get_claim_aud().unwrap();

        assert_eq!(aud.to_vec(), vec!["svcA", "svcB"]);
        assert!(aud.contains("svcB"));
        assert!(!aud.contains("svcC"));
        assert_eq!(aud.to_value(), json!(["svcA", "svcB"]));
    }

    #[test]
    fn aud_without_usable_entries_fails_enforcement() {
        for aud in [json!([]), json!([""]), json!([1, 2]), json!("")] {
            let parts = parts_with(None, Some(json!({ "aud": aud })));

            let (result, logs) = capture_logs(|| parts.require_claim_aud().map(|_| ()));

            assert_eq!(result, Err(MissingCredential::Claim("aud".into())));
            assert_eq!(error_lines(&logs).len(), 1);
        }
    }

    #[test]
    fn empty_claims_object_is_still_present() {
        let parts = parts_with(None, Some(json!({})));

        let (result, logs) = capture_logs(|| parts.require_claims().map(Map::len));

        assert_eq!(result, Ok(0));
        assert!(logs.is_empty());
    }

    #[test]
    fn require_claim_rejects_null_and_empty_values() {
        let parts = parts_with(
            None,
            Some(json!({"scope": "read", "tenant": null, "role": "", "n": 0})),
        );

        let (results, logs) = capture_logs(|| {
            (
                parts.require_claim("scope").cloned(),
                parts.require_claim("tenant").cloned(),
                parts.require_claim("role").cloned(),
                parts.require_claim("n").cloned(),
            )
        });

        assert_eq!(results.0, Ok(json!("read")));
        assert_eq!(results.1, Err(MissingCredential::Claim("tenant".into())));
        assert_eq!(results.2, Err(MissingCredential::Claim("role".into())));
        assert_eq!(results.3, Ok(json!(0)));
        assert!(logs.contains("JWT claim 'tenant' missing from request"));
    }

    #[test]
    fn repeated_calls_are_idempotent_and_log_per_call() {
        let parts = parts_with(Some("t"), Some(json!({"sub": "u1"})));

        let (results, logs) = capture_logs(|| {
            [
                parts.require_claim_aud(),
                parts.require_claim_aud(),
            ]
        });

        assert_eq!(results[0], results[1]);
        assert_eq!(parts.get_claim_sub(), parts.get_claim_sub());
        assert_eq!(error_lines(&logs).len(), 2);
    }

    #[test]
    fn request_and_extensions_share_the_same_accessors() {
        let mut req = http::Request::new(());
        req.extensions_mut().insert(JwtToken("abc".into()));
        req.extensions_mut()
            .insert(JwtClaims(json!({"sub": "u1", "aud": "svcA"})));

        assert_eq!(req.get_token(), Some("abc"));
        assert_eq!(req.extensions().get_claim_aud(), Some(ClaimAud::One("svcA")));
    }

    // Keeps the token in the Authorization header instead of the extension slot.
    struct HeaderTokenRequest(Parts);

    impl JwtRequestExt for HeaderTokenRequest {
        fn jwt_env(&self) -> &Extensions {
            &self.0.extensions
        }

        fn get_token(&self) -> Option<&str> {
            self.0
                .headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        }
    }

    #[test]
    fn overridden_getter_changes_storage_location() {
        let (mut parts, _body) = http::Request::new(()).into_parts();
        parts.extensions.insert(JwtToken("from-extensions".into()));
        parts
            .headers
            .insert(header::AUTHORIZATION, "Bearer from-header".parse().unwrap());
        let req = HeaderTokenRequest(parts);

        let (result, _logs) = capture_logs(|| req.require_token().map(str::to_owned));

        assert_eq!(result.as_deref(), Ok("from-header"));
    }
}
