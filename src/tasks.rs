use chrono::{NaiveDate, Utc};
use futures::future::try_join_all;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use validator::Validate;

use crate::auth::AuthService;
use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskResponse};
use crate::store::TaskStore;

/// Task CRUD. Owner existence is checked through [`AuthService`], and every returned
/// task carries its owner's name.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    auth: AuthService,
    clock: fn() -> NaiveDate,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, auth: AuthService) -> Self {
        Self {
            tasks,
            auth,
            clock: today,
        }
    }

    /// Replaces the date source used for `createdAt`/`updatedAt`.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    /// All tasks, or only those owned by `owner_id`.
    pub async fn list(&self, owner_id: Option<i64>) -> Result<Vec<TaskResponse>, AppError> {
        let tasks = match owner_id {
            Some(owner_id) => self.tasks.find_by_user(owner_id).await?,
            None => self.tasks.find_all().await?,
        };
        self.with_owner_names(tasks).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<TaskResponse, AppError> {
        let task = self.find(id).await?;
        self.with_owner_name(task).await
    }

    pub async fn create(&self, input: TaskInput, owner_id: i64) -> Result<TaskResponse, AppError> {
        let owner = self.auth.get_user_by_id(owner_id).await?;
        input.validate()?;

        let task = self
            .tasks
            .insert(input.into_new_task(owner.id, (self.clock)()))
            .await?;
        log::info!("Created task {} for user {}", task.id, owner.id);
        Ok(TaskResponse::new(task, Some(owner.name)))
    }

    /// Full replace of title, description, status and due date. The owner never changes.
    pub async fn update(&self, id: i64, input: TaskInput) -> Result<TaskResponse, AppError> {
        let mut task = self.find(id).await?;
        input.validate()?;

        input.apply_to(&mut task, (self.clock)());
        let task = self.tasks.save(task).await?;
        log::info!("Updated task {}", task.id);
        self.with_owner_name(task).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.tasks.delete_by_id(id).await? {
            return Err(AppError::not_found("Task", id));
        }
        log::info!("Deleted task {}", id);
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<Task, AppError> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task", id))
    }

    async fn with_owner_name(&self, task: Task) -> Result<TaskResponse, AppError> {
        let owner = self.auth.get_user_by_id(task.user_id).await?;
        Ok(TaskResponse::new(task, Some(owner.name)))
    }

    async fn with_owner_names(&self, tasks: Vec<Task>) -> Result<Vec<TaskResponse>, AppError> {
        let owner_ids: BTreeSet<i64> = tasks.iter().map(|t| t.user_id).collect();
        log::debug!("Resolving {} owners for {} tasks", owner_ids.len(), tasks.len());

        let owners = try_join_all(owner_ids.into_iter().map(|id| self.auth.get_user_by_id(id))).await?;
        let names: HashMap<i64, String> = owners.into_iter().map(|u| (u.id, u.name)).collect();

        Ok(tasks
            .into_iter()
            .map(|task| {
                let name = names.get(&task.user_id).cloned();
                TaskResponse::new(task, name)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    async fn setup() -> (TaskService, i64) {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone()).with_hash_cost(crate::auth::MIN_HASH_COST);
        let owner = auth.register("Ann", "a@x.com", "secret").await.unwrap();
        (TaskService::new(store, auth).with_clock(fixed_day), owner.id)
    }

    fn input(title: &str, status: TaskStatus) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            status,
            due_date: None,
        }
    }

    #[actix_rt::test]
    async fn test_create_sets_dates_and_owner() {
        let (service, owner_id) = setup().await;
        let task = service
            .create(input("Write report", TaskStatus::Pending), owner_id)
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, fixed_day());
        assert_eq!(task.updated_at, fixed_day());
        assert_eq!(task.user_id, owner_id);
        assert_eq!(task.user_name.as_deref(), Some("Ann"));
    }

    #[actix_rt::test]
    async fn test_create_with_unknown_owner_persists_nothing() {
        let (service, _) = setup().await;
        let result = service
            .create(input("Write report", TaskStatus::Pending), 99)
            .await;

        assert_eq!(result.unwrap_err(), AppError::not_found("User", 99));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_create_with_blank_title_persists_nothing() {
        let (service, owner_id) = setup().await;
        let result = service.create(input("  ", TaskStatus::Pending), owner_id).await;

        assert_eq!(
            result.unwrap_err(),
            AppError::ValidationError("Title is required".into())
        );
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_update_round_trips_all_fields() {
        let (service, owner_id) = setup().await;
        let created = service
            .create(input("Write report", TaskStatus::Pending), owner_id)
            .await
            .unwrap();

        let replacement = TaskInput {
            title: "Write final report".into(),
            description: Some("with charts".into()),
            status: TaskStatus::Completed,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        };
        service.update(created.id, replacement.clone()).await.unwrap();

        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, replacement.title);
        assert_eq!(fetched.description, replacement.description);
        assert_eq!(fetched.status, TaskStatus::Completed);
        assert_eq!(fetched.due_date, replacement.due_date);
        assert_eq!(fetched.updated_at, fixed_day());
        assert_eq!(fetched.user_id, owner_id);
    }

    #[actix_rt::test]
    async fn test_update_validates_and_checks_existence() {
        let (service, owner_id) = setup().await;
        assert_eq!(
            service
                .update(5, input("x", TaskStatus::Pending))
                .await
                .unwrap_err(),
            AppError::not_found("Task", 5)
        );

        let created = service
            .create(input("Write report", TaskStatus::Pending), owner_id)
            .await
            .unwrap();
        assert!(matches!(
            service.update(created.id, input("", TaskStatus::Pending)).await,
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(
            service.get_by_id(created.id).await.unwrap().title,
            "Write report"
        );
    }

    #[actix_rt::test]
    async fn test_delete_then_get_is_not_found() {
        let (service, owner_id) = setup().await;
        let created = service
            .create(input("Write report", TaskStatus::Pending), owner_id)
            .await
            .unwrap();

        service.delete(created.id).await.unwrap();
        assert_eq!(
            service.get_by_id(created.id).await.unwrap_err(),
            AppError::not_found("Task", created.id)
        );
        assert_eq!(
            service.delete(created.id).await.unwrap_err(),
            AppError::not_found("Task", created.id)
        );
    }

    #[actix_rt::test]
    async fn test_list_filters_by_owner() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone()).with_hash_cost(crate::auth::MIN_HASH_COST);
        let ann = auth.register("Ann", "a@x.com", "secret").await.unwrap();
        let bob = auth.register("Bob", "b@x.com", "secret").await.unwrap();
        let service = TaskService::new(store, auth);

        service.create(input("a1", TaskStatus::Pending), ann.id).await.unwrap();
        service.create(input("b1", TaskStatus::InProgress), bob.id).await.unwrap();
        service.create(input("a2", TaskStatus::Completed), ann.id).await.unwrap();

        let all = service.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].user_name.as_deref(), Some("Bob"));

        let titles: Vec<String> = service
            .list(Some(ann.id))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a1".to_string(), "a2".to_string()]);

        assert!(service.list(Some(404)).await.unwrap().is_empty());
    }
}
