/*
 * Responsibility
 * - handler 向け extractor の公開インターフェース
 */
pub mod jwt;

pub use jwt::{Audience, Claims, JwtRequestExt, Subject, Token};
