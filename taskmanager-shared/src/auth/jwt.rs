/// JWT issuance and verification
///
/// Tokens are signed with a shared HMAC secret and carry the user's email as
/// the subject plus the numeric user id. They are stateless: nothing is
/// persisted, and every request re-verifies the signature and expiry.
///
/// # Security
///
/// - **Algorithm**: HS256 on issue; HS256, HS384 and HS512 accepted on verify
/// - **Expiration**: 24 hours by default
/// - **Issuer**: always `taskmanager`
/// - **Secret**: configured once at startup and passed in explicitly
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use taskmanager_shared::auth::jwt::TokenService;
/// use taskmanager_shared::models::user::User;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new("a-secret-key-that-is-at-least-32-bytes");
/// let user = User {
///     id: 1,
///     name: "Lorem Ipsum".to_string(),
///     email: "lorem@ipsum.com".to_string(),
///     password_hash: String::new(),
///     created_at: Utc::now(),
/// };
///
/// let token = tokens.issue_token(&user)?;
/// let claims = tokens.verify(&token)?;
/// assert_eq!(claims.sub, "lorem@ipsum.com");
/// assert_eq!(claims.user_id, 1);
/// # Ok(())
/// # }
/// ```

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Issuer written into and required from every token
pub const ISSUER: &str = "taskmanager";

/// Default token lifetime
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Signing failed
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// The user to issue for has no usable identity
    #[error("Cannot issue token: {0}")]
    InvalidIdentity(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid issuer")]
    InvalidIssuer,

    /// Header names an algorithm outside the HMAC family
    #[error("Unexpected signing method")]
    InvalidAlgorithm,
}

/// Claims carried by an identity token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email
    pub sub: String,

    pub user_id: i64,

    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies identity tokens with one signing secret
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service for the given HMAC secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }

    /// Overrides the token lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a signed token for a registered user
    ///
    /// # Errors
    ///
    /// - `JwtError::InvalidIdentity` if the user has no email or no id
    /// - `JwtError::CreateError` if signing fails
    pub fn issue_token(&self, user: &User) -> Result<String, JwtError> {
        if user.email.trim().is_empty() {
            return Err(JwtError::InvalidIdentity("missing email".to_string()));
        }
        if user.id < 1 {
            return Err(JwtError::InvalidIdentity(format!("invalid user id {}", user.id)));
        }

        let now = Utc::now();
        let claims = Claims {
            sub: user.email.clone(),
            user_id: user.id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Verifies signature, algorithm family, issuer and expiry
    ///
    /// Does not check that the subject still exists; that lookup belongs to
    /// [`super::middleware::authenticate`].
    ///
    /// # Errors
    ///
    /// - `JwtError::Expired` if `exp` has passed
    /// - `JwtError::InvalidAlgorithm` for non-HMAC headers
    /// - `JwtError::InvalidIssuer` for foreign issuers
    /// - `JwtError::ValidationError` for bad signatures or malformed tokens
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
                ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
                _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(data.claims)
    }
}
