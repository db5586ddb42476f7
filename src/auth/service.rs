use std::sync::Arc;

use crate::auth::password::{hash_password_with_cost, verify_password};
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::UserStore;

/// Account registration and credential checks on top of a [`UserStore`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Sets the bcrypt work factor used for new passwords.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Creates an account. Fails with `DuplicateEmail` if the email is already registered.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        log::info!("Registering user with email: {}", email);

        if self.users.exists_by_email(email).await? {
            log::warn!("Signup rejected, email already registered: {}", email);
            return Err(AppError::DuplicateEmail(email.to_string()));
        }

        let user = self
            .users
            .insert(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password_with_cost(password, self.hash_cost)?,
            })
            .await?;

        log::info!("User registered successfully: {} (id {})", user.email, user.id);
        Ok(user)
    }

    /// Returns the user whose email and password both match.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        log::info!("Login attempt for email: {}", email);

        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                log::warn!("Login failed, no user with email: {}", email);
                return Err(AppError::NotFound("User not found".into()));
            }
        };

        if !verify_password(password, &user.password_hash)? {
            log::warn!("Login failed, wrong password for email: {}", email);
            return Err(AppError::InvalidCredentials);
        }

        log::info!("User logged in successfully: {}", user.email);
        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))
    }
}
