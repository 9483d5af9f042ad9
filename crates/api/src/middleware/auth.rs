//! Admin bearer-token extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::models::CurrentAdmin;
use crate::services::admin_auth::{AuthError, TokenSigner};
use crate::state::AppState;

/// Extractor that rejects requests without a valid admin bearer token.
///
/// Missing credentials get 401; a token that is present but bad gets 400,
/// so the admin frontend can distinguish "log in" from "log in again".
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthError::TokenMissing)?;

        let signer = TokenSigner::new(state.config().admin_token_secret.clone());
        let admin = signer.verify(token, chrono::Utc::now().timestamp())?;

        Ok(Self(admin))
    }
}
