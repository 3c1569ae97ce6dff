//! # Task Manager API Server Library
//!
//! HTTP surface of the task manager: configuration, router, authentication
//! layer, handlers and error mapping. Domain logic lives in
//! `taskmanager-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from the environment
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Bearer token authentication
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
