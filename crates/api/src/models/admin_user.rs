//! Back-office admin accounts.

use chrono::{DateTime, Utc};
use soundbeatx_core::{AdminId, AdminRole, Email};

/// A persisted admin account. The password hash never leaves this layer.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: AdminId,
    pub username: String,
    pub email: Email,
    pub password_hash: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The authenticated admin attached to a request after token verification.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: AdminId,
    pub email: String,
    pub role: AdminRole,
}
