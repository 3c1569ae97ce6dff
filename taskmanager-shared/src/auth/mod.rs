/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: Identity token issuance and verification
/// - [`middleware`]: Bearer header parsing and request authentication
/// - [`authorization`]: Task ownership checks
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::auth::jwt::TokenService;
/// use taskmanager_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("l0r3mIpsum")?;
/// assert!(verify_password("l0r3mIpsum", &hash)?);
///
/// let tokens = TokenService::new("a-secret-key-that-is-at-least-32-bytes");
/// assert!(tokens.verify("garbage").is_err());
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
