use async_trait::async_trait;

use crate::domain::{NewTask, NewUser, Page, Task, TaskFilter, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// `T` is the stored entity, `N` the not-yet-stored form the store assigns
/// an id to, `ID` the key type.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique violations surface as `RepoError::Constraint`.
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser, i64> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Users in insertion order.
    async fn list(&self, page: Page) -> Result<Vec<User>, RepoError>;

    /// Delete a user and every task it owns in one transaction.
    async fn delete_with_tasks(&self, id: i64) -> Result<(), RepoError>;
}

/// Task repository. Lookups are always scoped to an owner.
#[async_trait]
pub trait TaskRepository: BaseRepository<Task, NewTask, i64> {
    async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Task>, RepoError>;

    /// Owner's tasks matching the filter, in insertion order, paginated
    /// after filtering.
    async fn list_owned(&self, owner_id: i64, filter: &TaskFilter)
    -> Result<Vec<Task>, RepoError>;
}
