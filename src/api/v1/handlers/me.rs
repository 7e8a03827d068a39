/*
 * Responsibility
 * - GET /me, GET /claims
 * - 検証済み JWT の中身を返すだけ (認証の判断は JwtRequestExt / extractor に任せる)
 */
use axum::{Json, body::Body, http::Request};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::v1::extractors::{JwtRequestExt, Subject};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub sub: String,
    /// Same shape as the claim: a string or an array of strings.
    pub aud: Option<Value>,
}

/// `sub` is mandatory, `aud` is reported if present.
pub async fn me(Subject(sub): Subject, req: Request<Body>) -> Json<MeResponse> {
    Json(MeResponse {
        sub,
        aud: req.get_claim_aud().map(|aud| aud.to_value()),
    })
}

pub async fn claims(req: Request<Body>) -> Result<Json<Map<String, Value>>, AppError> {
    let claims = req.require_claims()?;
    Ok(Json(claims.clone()))
}
