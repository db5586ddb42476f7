use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum; serializes as the literal variant name.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is yet to be started.
    Pending,
    /// Task is currently being worked on.
    InProgress,
    /// Task is done.
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| {
                let expected: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
                AppError::ValidationError(format!(
                    "Invalid status '{}'; expected one of {}",
                    value,
                    expected.join(", ")
                ))
            })
    }
}

/// A task as stored in the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    /// Owning user. Set on creation and never reassigned.
    pub user_id: i64,
}

/// A task that has not been persisted yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub user_id: i64,
}

impl NewTask {
    pub fn into_task(self, id: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            user_id: self.user_id,
        }
    }
}

/// The mutable fields of a task, already parsed into domain types.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct TaskInput {
    #[validate(custom = "validate_not_blank")]
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::from("Title is required"));
        return Err(error);
    }
    Ok(())
}

impl TaskInput {
    /// Creates the unsaved record for `user_id`, stamping both dates with `today`.
    pub fn into_new_task(self, user_id: i64, today: NaiveDate) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            created_at: today,
            updated_at: today,
            user_id,
        }
    }

    /// Overwrites every mutable field of `task`. Id, owner and `created_at` are kept.
    pub fn apply_to(self, task: &mut Task, today: NaiveDate) {
        task.title = self.title;
        task.description = self.description;
        task.status = self.status;
        task.due_date = self.due_date;
        task.updated_at = today;
    }
}

/// JSON body accepted by `POST /api/tasks` and `PUT /api/tasks/{id}`.
///
/// Every field is optional at the serde level so that presence, format and
/// business checks happen in a fixed order with our own messages.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
    pub user_id: Option<i64>,
}

impl TaskRequest {
    /// Checks required fields, then parses `status` and `dueDate`.
    /// Title blankness is left to [`TaskInput`] validation in the service.
    pub fn into_input(self) -> Result<TaskInput, AppError> {
        let (title, status) = match (self.title, self.status) {
            (Some(title), Some(status)) => (title, status),
            (None, _) => return Err(AppError::ValidationError("Title is required".into())),
            (_, None) => return Err(AppError::ValidationError("Status is required".into())),
        };

        let status = status.parse::<TaskStatus>()?;
        let due_date = self.due_date.as_deref().map(parse_date).transpose()?;

        Ok(TaskInput {
            title,
            description: self.description,
            status,
            due_date,
        })
    }
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::ValidationError(format!(
            "Invalid date '{}'; expected format YYYY-MM-DD",
            value
        ))
    })
}

/// Query parameters for `GET /api/tasks`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    /// Restrict the listing to one owner.
    pub user_id: Option<i64>,
}

/// Task as returned by the API, with the owner's display name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl TaskResponse {
    pub fn new(task: Task, user_name: Option<String>) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            created_at: task.created_at,
            updated_at: task.updated_at,
            user_id: task.user_id,
            user_name,
        }
    }
}
