/// API route handlers
///
/// Handlers translate between JSON and service calls only. Business rules
/// live in `taskmanager_shared::services`.
///
/// - `health`: Liveness and database connectivity
/// - `auth`: Registration and login
/// - `tasks`: Task CRUD for the authenticated caller

pub mod auth;
pub mod health;
pub mod tasks;
