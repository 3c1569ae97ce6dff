//! # Task Manager Shared Library
//!
//! This crate contains the domain types, persistence, business rules and
//! authentication primitives used by the Task Manager API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `repository`: Parametrized SQL behind the `UserRepository` / `TaskRepository` traits
//! - `services`: Business-rule sequencing on top of the repositories
//! - `validation`: Pure request validators
//! - `auth`: Password hashing, JWT tokens, authentication and ownership checks
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

/// Current version of the Task Manager shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
