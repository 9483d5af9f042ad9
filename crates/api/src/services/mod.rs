//! Business logic sitting between routes and storage.

pub mod admin_auth;
pub mod checkout;
