/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    /// middleware 側で 401 にするか、handler の `require_*` に任せるか
    pub auth_token_required: bool,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>, auth_token_required: bool) -> Self {
        Self {
            auth,
            auth_token_required,
        }
    }
}
