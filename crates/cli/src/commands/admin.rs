//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! sbx-cli admin create -u store-admin -e admin@example.com -p 'a strong password'
//! ```

use soundbeatx_core::{AdminRole, Email};

use soundbeatx_api::db::{AdminRepository, RepositoryError};
use soundbeatx_api::services::admin_auth;

use super::{CliError, connect};

/// Create a new admin account.
///
/// # Errors
///
/// Returns `CliError` for invalid input, duplicate accounts, or database
/// failure.
pub async fn create(
    username: &str,
    email: &str,
    password: &str,
    role: &str,
) -> Result<(), CliError> {
    let role: AdminRole = role.parse().map_err(|_| {
        CliError::InvalidInput(format!(
            "Invalid role: {role}. Valid roles: super_admin, admin"
        ))
    })?;

    let email = Email::parse(email)
        .map_err(|e| CliError::InvalidInput(format!("Invalid email: {e}")))?;

    admin_auth::validate_password(password).map_err(|_| {
        CliError::InvalidInput(format!(
            "Password must be at least {} characters",
            admin_auth::MIN_PASSWORD_LENGTH
        ))
    })?;

    let password_hash = admin_auth::hash_password(password)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let pool = connect().await?;
    let repo = AdminRepository::new(&pool);

    tracing::info!("Creating admin account: {} ({})", email, role);

    let admin = repo
        .create(username, &email, &password_hash, role)
        .await
        .map_err(|err| match err {
            RepositoryError::Conflict(msg) => CliError::InvalidInput(msg),
            other => CliError::Repository(other),
        })?;

    tracing::info!(
        "Admin created successfully! ID: {}, Email: {}, Role: {}",
        admin.id,
        admin.email,
        admin.role
    );

    Ok(())
}
