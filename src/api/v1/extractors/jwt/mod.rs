/*!
 * JWT request context
 *
 * Responsibility:
 * - 検証済み JWT (token / claims) を request extensions から読み出す
 * - 署名検証や claim の妥当性チェックは middleware/services 側の責務
 *
 * Public API:
 * - JwtToken / JwtClaims (extension slots), ClaimAud
 * - JwtRequestExt, MissingCredential (accessor)
 * - Token / Claims / Subject / Audience (extractors)
 */

mod accessor;
mod core;
mod types;

pub use accessor::{JwtRequestExt, MissingCredential};
pub use self::core::{Audience, Claims, Subject, Token};
pub use types::{ClaimAud, JwtClaims, JwtToken};
