//! User directory - account CRUD with uniqueness and ownership rules.

use std::sync::Arc;

use crate::domain::{NewUser, Page, User, UserInput};
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const EMAIL_TAKEN: &str = "Email already exists";
pub const USERNAME_OR_EMAIL_TAKEN: &str = "Username or email already exists";

pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserDirectory {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new account.
    ///
    /// A taken username is reported before a taken email. The lookup is only
    /// a pre-check: the store's unique constraint decides, and a violation
    /// there is classified with the same username-first rule.
    pub async fn create(&self, input: UserInput) -> Result<User, DomainError> {
        if let Some(conflict) = self.find_conflict(&input.username, &input.email).await? {
            return Err(conflict);
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let new_user = NewUser {
            username: input.username,
            email: input.email,
            password_hash,
        };
        let (username, email) = (new_user.username.clone(), new_user.email.clone());

        match self.users.insert(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "User created");
                Ok(user)
            }
            Err(RepoError::Constraint(msg)) => {
                tracing::debug!(constraint = %msg, "Insert raced a concurrent registration");
                Err(self
                    .find_conflict(&username, &email)
                    .await?
                    .unwrap_or_else(|| DomainError::Conflict(USERNAME_OR_EMAIL_TAKEN.to_string())))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_conflict(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<DomainError>, DomainError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Ok(Some(DomainError::Conflict(USERNAME_TAKEN.to_string())));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Ok(Some(DomainError::Conflict(EMAIL_TAKEN.to_string())));
        }
        Ok(None)
    }

    /// All users in insertion order. Callers must be authenticated.
    pub async fn list(&self, page: Page) -> Result<Vec<User>, DomainError> {
        Ok(self.users.list(page).await?)
    }

    pub async fn get(&self, id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// Only the account itself may modify or delete it.
    pub fn ensure_owner(id: i64, caller: &User) -> Result<(), DomainError> {
        if caller.id != id {
            tracing::warn!(caller_id = caller.id, target_id = id, "Refusing cross-user change");
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }

    /// Replace username, email and password of the caller's own account.
    pub async fn update(
        &self,
        id: i64,
        input: UserInput,
        caller: &User,
    ) -> Result<User, DomainError> {
        Self::ensure_owner(id, caller)?;

        let mut user = caller.clone();
        user.username = input.username;
        user.email = input.email;
        user.password_hash = self.passwords.hash(&input.password)?;
        user.touch();

        self.users.update(user).await.map_err(|e| match e {
            RepoError::Constraint(_) => DomainError::Conflict(USERNAME_OR_EMAIL_TAKEN.to_string()),
            RepoError::NotFound => DomainError::user_not_found(id),
            other => other.into(),
        })
    }

    /// Delete the caller's own account together with its tasks.
    pub async fn delete(&self, id: i64, caller: &User) -> Result<(), DomainError> {
        Self::ensure_owner(id, caller)?;

        self.users.delete_with_tasks(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::user_not_found(id),
            other => other.into(),
        })?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
