mod access_jwt;

pub use access_jwt::{AccessJwtError, AuthService};

#[cfg(test)]
pub(crate) use access_jwt::tests as test_keys;
