//! SoundBeatX Core - Shared types library.
//!
//! This crate provides common types used across all SoundBeatX components:
//! - `api` - REST backend serving the storefront and the admin panel
//! - `cli` - Command-line tools for migrations, seeding and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Hex entity IDs, order/payment status enums, email addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
