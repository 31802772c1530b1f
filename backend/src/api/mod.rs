//! Central module for the application's non-auth API endpoints.
//!
//! Authentication routes live in `crate::auth` and are mounted separately.

pub mod health;
