//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use zero_core::domain::{
    DEFAULT_LIMIT, DEFAULT_OFFSET, Page, Task, TaskFilter, TaskPatch, TaskState, User, UserInput,
};
use zero_core::services::AccessToken;

/// Plain `{message}` body used for greetings and delete confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Full account payload for registration and replacement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserSchema {
    pub username: String,
    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,
    pub password: String,
}

impl From<UserSchema> for UserInput {
    fn from(schema: UserSchema) -> Self {
        Self {
            username: schema.username,
            email: schema.email,
            password: schema.password,
        }
    }
}

/// A user as seen from outside. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<UserPublic>,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// OAuth2 password-grant form. `username` carries the email.
///
/// Other OAuth2 form fields (`grant_type`, `scope`, ...) are accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<AccessToken> for TokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type.to_string(),
            expires_in: token.expires_in,
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination and filters
// ---------------------------------------------------------------------------

fn default_offset() -> u64 {
    DEFAULT_OFFSET
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// `?offset=&limit=` query. Negative values fail to deserialize.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterPage {
    #[serde(default = "default_offset")]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for FilterPage {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl From<FilterPage> for Page {
    fn from(filter: FilterPage) -> Self {
        Page::new(filter.offset, filter.limit)
    }
}

/// Todo listing query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FilterTodo {
    #[validate(length(min = 3, message = "title must have at least 3 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TaskState>,
    #[serde(default = "default_offset")]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl From<FilterTodo> for TaskFilter {
    fn from(filter: FilterTodo) -> Self {
        Self {
            title: filter.title,
            description: filter.description,
            state: filter.state,
            page: Page::new(filter.offset, filter.limit),
        }
    }
}

// ---------------------------------------------------------------------------
// Todos
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoSchema {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub state: TaskState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPublic {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub state: TaskState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TodoPublic {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            state: task.state,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<TodoPublic>,
}

/// Partial todo update; absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TaskState>,
}

impl From<TodoUpdate> for TaskPatch {
    fn from(update: TodoUpdate) -> Self {
        Self {
            title: update.title,
            description: update.description,
            state: update.state,
        }
    }
}
