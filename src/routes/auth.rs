use crate::{
    auth::{AuthResponse, AuthService, LoginRequest, SignupRequest, TokenIssuer},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates the account and returns the user with a freshly signed token.
///
/// ## Responses:
/// - `200 OK`: `{"user": {...}, "token": "..."}`.
/// - `400 Bad Request`: missing fields or an email that is already registered.
#[post("/signup")]
pub async fn signup(
    auth: web::Data<AuthService>,
    tokens: web::Data<TokenIssuer>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let (name, email, password) = signup_data.into_inner().into_parts().map_err(|e| {
        log::error!("Missing required fields in signup request");
        e
    })?;

    let user = auth.register(&name, &email, &password).await?;
    let token = tokens.generate_token(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{"user": {...}, "token": "..."}`.
/// - `400 Bad Request`: missing fields or a wrong password.
/// - `404 Not Found`: no account with that email.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    tokens: web::Data<TokenIssuer>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let (email, password) = login_data.into_inner().into_parts().map_err(|e| {
        log::error!("Missing required fields in login request");
        e
    })?;

    let user = auth.login(&email, &password).await?;
    let token = tokens.generate_token(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user.into(),
        token,
    }))
}
