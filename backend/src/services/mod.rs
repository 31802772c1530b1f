//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business operations
//! on top of the repositories.

pub mod user_service;
