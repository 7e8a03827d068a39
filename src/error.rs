/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body / auth challenge)
 * - MissingCredential など下位のエラーを統一的に変換
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::api::v1::extractors::jwt::MissingCredential;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut res = (status, Json(body)).into_response();
        // Bearer challenge so clients know to (re)send a token
        res.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static("bearer"),
        );
        res
    }
}

impl From<MissingCredential> for AppError {
    // Which credential was missing is already in the server log; the client only sees 401.
    fn from(_: MissingCredential) -> Self {
        AppError::Unauthorized
    }
}
