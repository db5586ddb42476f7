use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, User};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

/// In-process store behind a single `RwLock`. Ids are assigned sequentially from 1,
/// and `BTreeMap` keeps listings in id order like `ORDER BY id` does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|u| u.email == email))
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail(user.email));
        }
        tables.last_user_id += 1;
        let user = user.into_user(tables.last_user_id);
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, AppError> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.tables.read().await.tasks.values().cloned().collect())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, task: NewTask) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        // Same guarantee the foreign key gives on PostgreSQL.
        if !tables.users.contains_key(&task.user_id) {
            return Err(AppError::not_found("User", task.user_id));
        }
        tables.last_task_id += 1;
        let task = task.into_task(tables.last_task_id);
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn save(&self, task: Task) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        match tables.tasks.get_mut(&task.id) {
            Some(existing) => {
                existing.title = task.title;
                existing.description = task.description;
                existing.status = task.status;
                existing.due_date = task.due_date;
                existing.updated_at = task.updated_at;
                Ok(existing.clone())
            }
            None => Err(AppError::not_found("Task", task.id)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().await.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use chrono::NaiveDate;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    fn new_task(title: &str, user_id: i64) -> NewTask {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        NewTask {
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            due_date: None,
            created_at: today,
            updated_at: today,
            user_id,
        }
    }

    #[actix_rt::test]
    async fn test_user_ids_are_sequential_and_emails_unique() {
        let store = MemoryStore::new();
        let first = UserStore::insert(&store, new_user("a@x.com")).await.unwrap();
        let second = UserStore::insert(&store, new_user("b@x.com")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        let duplicate = UserStore::insert(&store, new_user("a@x.com")).await;
        assert_eq!(
            duplicate.unwrap_err(),
            AppError::DuplicateEmail("a@x.com".into())
        );
        assert_eq!(UserStore::find_all(&store).await.unwrap().len(), 2);
        assert!(store.exists_by_email("b@x.com").await.unwrap());
        assert!(store.find_by_email("c@x.com").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_task_lifecycle() {
        let store = MemoryStore::new();
        let ann = UserStore::insert(&store, new_user("a@x.com")).await.unwrap();
        let bob = UserStore::insert(&store, new_user("b@x.com")).await.unwrap();

        let t1 = TaskStore::insert(&store, new_task("one", ann.id)).await.unwrap();
        TaskStore::insert(&store, new_task("two", bob.id)).await.unwrap();
        TaskStore::insert(&store, new_task("three", ann.id)).await.unwrap();

        let titles: Vec<String> = store
            .find_by_user(ann.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["one", "three"]);
        assert_eq!(TaskStore::find_all(&store).await.unwrap().len(), 3);

        assert!(store.delete_by_id(t1.id).await.unwrap());
        assert!(!store.delete_by_id(t1.id).await.unwrap());
        assert!(TaskStore::find_by_id(&store, t1.id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_insert_task_requires_owner() {
        let store = MemoryStore::new();
        let result = TaskStore::insert(&store, new_task("orphan", 99)).await;
        assert_eq!(result.unwrap_err(), AppError::not_found("User", 99));
        assert!(TaskStore::find_all(&store).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_save_does_not_move_owner() {
        let store = MemoryStore::new();
        let ann = UserStore::insert(&store, new_user("a@x.com")).await.unwrap();
        let mut task = TaskStore::insert(&store, new_task("one", ann.id)).await.unwrap();

        task.user_id = 42;
        task.status = TaskStatus::Completed;
        let saved = store.save(task).await.unwrap();
        assert_eq!(saved.user_id, ann.id);
        assert_eq!(saved.status, TaskStatus::Completed);

        let missing = new_task("ghost", ann.id).into_task(77);
        assert_eq!(
            store.save(missing).await.unwrap_err(),
            AppError::not_found("Task", 77)
        );
    }
}
