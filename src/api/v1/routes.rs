/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、/me /claims は JWT 検証 middleware の内側
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    me::{claims, me},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/claims", get(claims));
    let protected = middleware::auth::access::apply(protected, state);

    Router::new().route("/health", get(health)).merge(protected)
}
