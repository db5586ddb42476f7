#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "User signup/login and CRUD on user-owned tasks. Contains the domain models, the"]
#![doc = "storage traits with their PostgreSQL and in-memory backends, the auth and task"]
#![doc = "services, routing configuration and error handling. The binary (`main.rs`) only"]
#![doc = "reads configuration, picks a store and starts the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;

pub use crate::error::AppError;
pub use crate::state::AppState;
