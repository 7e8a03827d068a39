/*
 * Responsibility
 * - モジュール構成の宣言 (binary は main.rs → app::run() のみ)
 * - JwtRequestExt / extractor を他の axum アプリからも使えるように公開
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;

pub use api::v1::extractors::jwt::{
    Audience, ClaimAud, Claims, JwtClaims, JwtRequestExt, JwtToken, MissingCredential, Subject,
    Token,
};
pub use error::AppError;
