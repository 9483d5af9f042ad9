//! Admin account repository.

use sqlx::PgPool;

use soundbeatx_core::{AdminId, AdminRole, Email};

use super::RepositoryError;
use crate::models::AdminUser;

const ADMIN_COLUMNS: &str =
    "id, username, email, password_hash, role, is_active, last_login, created_at";

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    last_login: Option<chrono::DateTime<chrono::Utc>>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<AdminRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .parse::<AdminId>()
            .map_err(|e| RepositoryError::DataCorruption(format!("admin id: {e}")))?;
        let email = Email::parse(&row.email)
            .map_err(|e| RepositoryError::DataCorruption(format!("admin email: {e}")))?;
        let role = row
            .role
            .parse::<AdminRole>()
            .map_err(|e| RepositoryError::DataCorruption(format!("admin role: {e}")))?;
        Ok(Self {
            id,
            username: row.username,
            email,
            password_hash: row.password_hash,
            role,
            is_active: row.is_active,
            last_login: row.last_login,
            created_at: row.created_at,
        })
    }
}

/// Repository for admin accounts.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(AdminUser::try_from).transpose()
    }

    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn find_by_id(&self, id: &AdminId) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_users WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(AdminUser::try_from).transpose()
    }

    /// Insert a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or username is
    /// already taken.
    pub async fn create(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
        role: AdminRole,
    ) -> Result<AdminUser, RepositoryError> {
        let id = AdminId::generate();
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "INSERT INTO admin_users (id, username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(username)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(
                    "Admin already exists with this email or username".to_string(),
                )
            }
            other => RepositoryError::Database(other),
        })?;

        row.try_into()
    }

    /// Stamp a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on database failure.
    pub async fn update_last_login(&self, id: &AdminId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE admin_users SET last_login = NOW() WHERE id = $1")
            .bind(id.as_str())
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
