//! Task store - per-owner todo CRUD.
//!
//! Every lookup is scoped to the owner, so a task belonging to someone else
//! is indistinguishable from one that does not exist.

use std::sync::Arc;

use crate::domain::{NewTask, Task, TaskFilter, TaskPatch, TaskState, User};
use crate::error::{DomainError, RepoError};
use crate::ports::TaskRepository;

pub struct TaskStore {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskStore {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn create(
        &self,
        owner: &User,
        title: String,
        description: String,
        state: Option<TaskState>,
    ) -> Result<Task, DomainError> {
        let task = self
            .tasks
            .insert(NewTask {
                owner_id: owner.id,
                title,
                description,
                state: state.unwrap_or_default(),
            })
            .await?;

        tracing::debug!(task_id = task.id, owner_id = owner.id, "Task created");
        Ok(task)
    }

    pub async fn list(&self, owner: &User, filter: &TaskFilter) -> Result<Vec<Task>, DomainError> {
        Ok(self.tasks.list_owned(owner.id, filter).await?)
    }

    pub async fn update(
        &self,
        owner: &User,
        task_id: i64,
        patch: TaskPatch,
    ) -> Result<Task, DomainError> {
        let mut task = self.find_owned(owner, task_id).await?;

        if !task.apply(patch) {
            return Ok(task);
        }

        self.tasks.update(task).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::task_not_found(task_id),
            other => other.into(),
        })
    }

    pub async fn delete(&self, owner: &User, task_id: i64) -> Result<(), DomainError> {
        self.find_owned(owner, task_id).await?;

        self.tasks.delete(task_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::task_not_found(task_id),
            other => other.into(),
        })?;

        tracing::debug!(task_id, owner_id = owner.id, "Task deleted");
        Ok(())
    }

    async fn find_owned(&self, owner: &User, task_id: i64) -> Result<Task, DomainError> {
        self.tasks
            .find_owned(owner.id, task_id)
            .await?
            .ok_or_else(|| DomainError::task_not_found(task_id))
    }
}
