use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use serde_json::{Map, Value};

use crate::error::AppError;

use super::JwtRequestExt;

/// Handler で raw JWT を受け取るための extractor
/// middleware が JwtToken を extensions に insert 済みである前提
/// 見つからない場合は 401 (`Option<Token>` なら None)
#[derive(Debug, Clone)]
pub struct Token(pub String);

/// Verified claims object.
#[derive(Debug, Clone)]
pub struct Claims(pub Map<String, Value>);

/// `sub` claim.
#[derive(Debug, Clone)]
pub struct Subject(pub String);

/// `aud` claim. The single-string form yields one entry.
#[derive(Debug, Clone)]
pub struct Audience(pub Vec<String>);

impl<S> FromRequestParts<S> for Token
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.require_token()?.to_owned()))
    }
}

impl<S> OptionalFromRequestParts<S> for Token
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.get_token().map(|t| Self(t.to_owned())))
    }
}

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.require_claims()?.clone()))
    }
}

impl<S> OptionalFromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.get_claims().cloned().map(Self))
    }
}

impl<S> FromRequestParts<S> for Subject
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.require_claim_sub()?.to_owned()))
    }
}

impl<S> OptionalFromRequestParts<S> for Subject
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.get_claim_sub().map(|s| Self(s.to_owned())))
    }
}

impl<S> FromRequestParts<S> for Audience
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.require_claim_aud()?.to_vec()))
    }
}

impl<S> OptionalFromRequestParts<S> for Audience
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.get_claim_aud().map(|aud| Self(aud.to_vec())))
    }
}
