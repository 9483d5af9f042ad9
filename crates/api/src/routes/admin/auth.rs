//! Admin authentication routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use serde_json::{Value, json};

use soundbeatx_core::{AdminRole, Email};

use crate::db::AdminRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::dto::AdminDto;
use crate::services::admin_auth::{
    self, AuthError, TokenSigner, hash_password, verify_password,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/profile", get(profile))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>> {
    // An unparseable email cannot match any account
    let email = Email::parse(&payload.email).map_err(|_| AuthError::InvalidCredentials)?;

    let repo = AdminRepository::new(state.pool());
    let admin = repo
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !admin.is_active {
        return Err(AuthError::AccountDisabled.into());
    }

    verify_password(&payload.password, &admin.password_hash)?;

    repo.update_last_login(&admin.id).await?;

    let signer = TokenSigner::new(state.config().admin_token_secret.clone());
    let token = signer.sign(
        &admin.id,
        admin.email.as_str(),
        admin.role,
        chrono::Utc::now().timestamp(),
    )?;

    tracing::info!(admin_id = %admin.id, "admin login");

    Ok(Json(json!({
        "success": true,
        "token": token,
        "admin": AdminDto::from(admin),
    })))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    role: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username, email, and password are required".to_string(),
        ));
    }

    let email = Email::parse(&payload.email)
        .map_err(|e| ApiError::BadRequest(format!("Invalid email: {e}")))?;

    admin_auth::validate_password(&payload.password).map_err(|_| {
        ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            admin_auth::MIN_PASSWORD_LENGTH
        ))
    })?;

    let role = match payload.role.as_deref() {
        None | Some("") => AdminRole::Admin,
        Some(value) => value
            .parse::<AdminRole>()
            .map_err(|_| ApiError::BadRequest("Invalid role".to_string()))?,
    };

    let password_hash = hash_password(&payload.password)?;

    let repo = AdminRepository::new(state.pool());
    let admin = repo
        .create(&payload.username, &email, &password_hash, role)
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::Conflict(_) => AuthError::AlreadyExists.into(),
            other => ApiError::from(other),
        })?;

    let signer = TokenSigner::new(state.config().admin_token_secret.clone());
    let token = signer.sign(
        &admin.id,
        admin.email.as_str(),
        admin.role,
        chrono::Utc::now().timestamp(),
    )?;

    tracing::info!(admin_id = %admin.id, "admin registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "admin": AdminDto::from(admin),
        })),
    ))
}

async fn profile(RequireAdmin(admin): RequireAdmin) -> Json<Value> {
    Json(json!({
        "admin": {
            "id": admin.id.as_str(),
            "email": admin.email,
            "role": admin.role.to_string(),
        }
    }))
}
