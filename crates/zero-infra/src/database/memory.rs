//! In-memory store - used as fallback when no database is configured, and in tests.
//!
//! Uniqueness and the user/task cascade are enforced under a single write
//! lock, mirroring what the database constraints guarantee.
//! Note: Data is lost on process restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use zero_core::domain::{NewTask, NewUser, Page, Task, TaskFilter, User};
use zero_core::error::RepoError;
use zero_core::ports::{BaseRepository, TaskRepository, UserRepository};

use super::mask_email;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    last_user_id: i64,
    last_task_id: i64,
}

impl Tables {
    /// The unique-constraint check: no *other* user may hold the username or email.
    fn check_unique(&self, id: Option<i64>, username: &str, email: &str) -> Result<(), RepoError> {
        let clash = self.users.values().find(|u| {
            Some(u.id) != id && (u.username == username || u.email == email)
        });

        match clash {
            Some(u) if u.username == username => Err(RepoError::Constraint(
                "duplicate key value violates unique constraint \"users_username_key\"".to_string(),
            )),
            Some(_) => Err(RepoError::Constraint(
                "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            )),
            None => Ok(()),
        }
    }
}

/// Shared tables backing both in-memory repositories.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: self.clone(),
        }
    }

    pub fn tasks(&self) -> InMemoryTaskRepository {
        InMemoryTaskRepository {
            store: self.clone(),
        }
    }
}

/// In-memory user repository.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: InMemoryStore,
}

#[async_trait]
impl BaseRepository<User, NewUser, i64> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_unique(None, &new.username, &new.email)?;

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_unique(Some(user.id), &user.username, &user.email)?;

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.tasks.values().any(|t| t.owner_id == id) {
            return Err(RepoError::Constraint(
                "update or delete on table \"users\" violates foreign key constraint".to_string(),
            ));
        }

        tables
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let tables = self.store.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(page.slice(tables.users.values().cloned()))
    }

    async fn delete_with_tasks(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        tables.tasks.retain(|_, task| task.owner_id != id);
        Ok(())
    }
}

/// In-memory task repository.
#[derive(Clone)]
pub struct InMemoryTaskRepository {
    store: InMemoryStore,
}

#[async_trait]
impl BaseRepository<Task, NewTask, i64> for InMemoryTaskRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.tasks.get(&id).cloned())
    }

    async fn insert(&self, new: NewTask) -> Result<Task, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains_key(&new.owner_id) {
            return Err(RepoError::Constraint(
                "insert on table \"todos\" violates foreign key constraint".to_string(),
            ));
        }

        tables.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: tables.last_task_id,
            owner_id: new.owner_id,
            title: new.title,
            description: new.description,
            state: new.state,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Task, RepoError> {
        let mut tables = self.store.tables.write().await;
        match tables.tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(task)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Task>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned())
    }

    async fn list_owned(
        &self,
        owner_id: i64,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, RepoError> {
        let tables = self.store.tables.read().await;
        let matching = tables
            .tasks
            .values()
            .filter(|t| t.owner_id == owner_id && filter.matches(t))
            .cloned();

        Ok(filter.page.slice(matching))
    }
}
