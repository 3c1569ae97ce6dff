/// Middleware for the API server
///
/// - `auth`: Bearer token authentication for the task routes

pub mod auth;
