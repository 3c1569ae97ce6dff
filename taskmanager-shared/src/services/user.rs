/// User service backed by a `UserRepository`

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{RegisterUser, ServiceError, UserService};
use crate::auth::password::{hash_password, verify_password};
use crate::models::user::{CreateUser, User};
use crate::repository::UserRepository;

pub struct DefaultUserService {
    repo: Arc<dyn UserRepository>,
}

impl DefaultUserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for DefaultUserService {
    async fn register(&self, user: RegisterUser) -> Result<User, ServiceError> {
        const OP: &str = "register";

        if self.email_exists(&user.email).await? {
            return Err(ServiceError::EmailTaken { op: OP });
        }

        let password_hash = hash_password(&user.password)
            .map_err(|source| ServiceError::Password { op: OP, source })?;

        let created = self
            .repo
            .create_user(CreateUser {
                name: user.name,
                email: user.email,
                password_hash,
            })
            .await
            .map_err(ServiceError::repository(OP))?;

        info!(user_id = created.id, "User registered");
        Ok(created)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        const OP: &str = "login";

        let Some(user) = self
            .repo
            .find_by_email(email)
            .await
            .map_err(ServiceError::repository(OP))?
        else {
            debug!("Login for unknown email");
            return Err(ServiceError::InvalidCredentials { op: OP });
        };

        let valid = verify_password(password, &user.password_hash)
            .map_err(|source| ServiceError::Password { op: OP, source })?;

        if !valid {
            debug!(user_id = user.id, "Login with wrong password");
            return Err(ServiceError::InvalidCredentials { op: OP });
        }

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ServiceError> {
        self.repo
            .email_exists(email)
            .await
            .map_err(ServiceError::repository("email_exists"))
    }
}
