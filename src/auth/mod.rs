pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::UserResponse;

// Re-export necessary items
pub use password::{hash_password_with_cost, verify_password, MAX_HASH_COST, MIN_HASH_COST};
pub use service::AuthService;
pub use token::{Claims, TokenIssuer};

/// Payload of `POST /api/auth/signup`.
///
/// Fields are optional so a missing one yields our own 400 message rather than a serde error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Payload of `POST /api/auth/login`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response after successful signup or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Signed JWT for the user. See [`TokenIssuer`].
    pub token: String,
}

/// Returns the value when it is present and not blank.
fn required(field: Option<String>) -> Result<String, AppError> {
    field
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("Missing required fields".into()))
}

impl SignupRequest {
    /// Returns `(name, email, password)` once all three are present.
    pub fn into_parts(self) -> Result<(String, String, String), AppError> {
        Ok((
            required(self.name)?,
            required(self.email)?,
            required(self.password)?,
        ))
    }
}

impl LoginRequest {
    /// Returns `(email, password)` once both are present.
    pub fn into_parts(self) -> Result<(String, String), AppError> {
        Ok((required(self.email)?, required(self.password)?))
    }
}
