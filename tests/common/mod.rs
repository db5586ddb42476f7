#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;
use taskboard::auth::{TokenIssuer, MIN_HASH_COST};
use taskboard::routes::{self, health};
use taskboard::store::MemoryStore;
use taskboard::AppState;

pub const TEST_SECRET: &str = "integration_test_secret";

/// Fresh in-memory state with a cheap bcrypt cost.
pub fn test_state() -> AppState {
    AppState::new(
        Arc::new(MemoryStore::new()),
        TokenIssuer::new(TEST_SECRET, 1),
        MIN_HASH_COST,
    )
}

/// The same App layout `main` serves, minus CORS.
pub async fn init_app(
    state: &AppState,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .configure(|cfg| state.configure(cfg))
                    .configure(routes::config),
            ),
    )
    .await
}

/// Sends `body` as JSON and returns the status code with the parsed body (`Null` when empty).
pub async fn send_json(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    req: test::TestRequest,
) -> (actix_web::http::StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            panic!(
                "Response is not JSON ({}): {:?}",
                e,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, body)
}

/// Signs a user up through the API and returns their id.
pub async fn signup(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    name: &str,
    email: &str,
) -> i64 {
    let (status, body) = send_json(
        app,
        test::TestRequest::post().uri("/api/auth/signup").set_json(json!({
            "name": name,
            "email": email,
            "password": "secret"
        })),
    )
    .await;
    assert!(status.is_success(), "Signup failed: {} {}", status, body);
    body["user"]["id"].as_i64().expect("user id in signup response")
}
