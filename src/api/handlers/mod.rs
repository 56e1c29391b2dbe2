//! API handlers for the sign-in service.

pub mod auth;
pub mod health;
pub mod root;
