pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskInput, TaskQuery, TaskRequest, TaskResponse, TaskStatus};
pub use user::{NewUser, User, UserResponse};
