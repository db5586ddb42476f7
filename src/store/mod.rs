//! Storage traits for users and tasks.
//!
//! Services only see `Arc<dyn UserStore>` / `Arc<dyn TaskStore>`. Two backends exist:
//! [`PgStore`] over PostgreSQL and [`MemoryStore`], used when no database is configured
//! and throughout the test suite. Each call is a single statement (or a single lock
//! acquisition), so record-level atomicity comes from the backend; concurrent writers to
//! the same task are last-write-wins.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;
    async fn find_all(&self) -> Result<Vec<User>, AppError>;
    /// Persists a new user. Fails with `DuplicateEmail` if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, AppError>;
    /// All tasks, ordered by id.
    async fn find_all(&self) -> Result<Vec<Task>, AppError>;
    /// Tasks owned by `user_id`, ordered by id.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError>;
    async fn insert(&self, task: NewTask) -> Result<Task, AppError>;
    /// Replaces every column of an existing row. Fails with `NotFound` if the row is gone.
    async fn save(&self, task: Task) -> Result<Task, AppError>;
    /// Returns `false` when no row had that id.
    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError>;
}
