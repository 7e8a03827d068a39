//! access token (JWT) 検証 → JwtToken / JwtClaims を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を AuthService で検証する
//! - 成功時のみ extensions に書き込む。handler 側は `JwtRequestExt` で読むだけ
//! - token が無い/不正な場合:
//!   - 既定: そのまま通す (判断は handler の `get_*` / `require_*` に任せる)
//!   - `auth_token_required`: ここで 401

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::jwt::{JwtClaims, JwtToken};
use crate::error::AppError;
use crate::state::AppState;

/// 保護したい route 群に JWT 検証 middleware を適用する。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = auth.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        tracing::debug!("no bearer token on request");
        if state.auth_token_required {
            return Err(AppError::Unauthorized);
        }
        return Ok(next.run(req).await);
    };

    // 署名検証 + iss/aud/exp/leeway は AuthService 側で実施
    match state.auth.verify(&token) {
        Ok(claims) => {
            // middleware → accessor/extractor への受け渡し
            req.extensions_mut().insert(JwtToken(token));
            req.extensions_mut().insert(JwtClaims(claims));
        }
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            if state.auth_token_required {
                return Err(AppError::Unauthorized);
            }
        }
    }

    Ok(next.run(req).await)
}
