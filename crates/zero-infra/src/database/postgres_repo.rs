//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use zero_core::domain::{Page, Task, TaskFilter, User};
use zero_core::error::RepoError;
use zero_core::ports::{TaskRepository, UserRepository};

use super::entity::task::{self, Entity as TaskEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// Largest offset or limit PostgreSQL accepts as a `BIGINT` bind.
const MAX_BOUND: u64 = i64::MAX as u64;

fn bounded(n: u64) -> u64 {
    n.min(MAX_BOUND)
}

/// Literal, case-sensitive substring match. `\`, `%` and `_` in the needle
/// are escaped so they never act as wildcards.
fn contains_literal(column: task::Column, needle: &str) -> SimpleExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');

    Expr::col((TaskEntity, column)).like(LikeExpr::new(pattern).escape('\\'))
}

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL task repository.
pub type PostgresTaskRepository = PostgresBaseRepository<TaskEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, page: Page) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .offset(bounded(page.offset))
            .limit(bounded(page.limit))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_with_tasks(&self, id: i64) -> Result<(), RepoError> {
        let txn = self.conn().begin().await.map_err(map_db_err)?;

        let tasks = TaskEntity::delete_many()
            .filter(task::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let deleted = UserEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if deleted.rows_affected == 0 {
            txn.rollback().await.map_err(map_db_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;
        tracing::debug!(user_id = id, tasks = tasks.rows_affected, "Deleted user with tasks");

        Ok(())
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Task>, RepoError> {
        let result = TaskEntity::find()
            .filter(task::Column::Id.eq(id))
            .filter(task::Column::UserId.eq(owner_id))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_owned(
        &self,
        owner_id: i64,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, RepoError> {
        let condition = Condition::all()
            .add(task::Column::UserId.eq(owner_id))
            .add_option(
                filter
                    .title
                    .as_deref()
                    .map(|title| contains_literal(task::Column::Title, title)),
            )
            .add_option(
                filter
                    .description
                    .as_deref()
                    .map(|description| {
                        contains_literal(task::Column::Description, description)
                    }),
            )
            .add_option(
                filter
                    .state
                    .map(|state| task::Column::State.eq(task::State::from(state))),
            );

        let result = TaskEntity::find()
            .filter(condition)
            .order_by_asc(task::Column::Id)
            .offset(bounded(filter.page.offset))
            .limit(bounded(filter.page.limit))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
