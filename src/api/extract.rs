//! Request extractors.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::models::AccountContext;

/// Header carrying the id of the acting account.
pub const ACCOUNT_HEADER: &str = "x-account-id";

/// Reads the acting account from the `x-account-id` header.
///
/// A missing or malformed header yields an anonymous context, which the
/// services reject as unauthorized.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AccountContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account_id = parts
            .headers
            .get(ACCOUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok());

        Ok(match account_id {
            Some(id) => AccountContext::for_account(id),
            None => AccountContext::anonymous(),
        })
    }
}
