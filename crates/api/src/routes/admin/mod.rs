//! Admin back-office routes. Everything except login/register requires a
//! bearer token.

pub mod auth;
pub mod orders;
pub mod products;
