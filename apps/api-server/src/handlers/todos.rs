//! Todo endpoints. Every operation is scoped to the caller's own todos.

use actix_web::{HttpResponse, web};
use validator::Validate;

use zero_core::domain::TaskFilter;
use zero_shared::dto::{FilterTodo, Message, TodoList, TodoPublic, TodoSchema, TodoUpdate};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /todos/
pub async fn create_todo(
    user: CurrentUser,
    state: web::Data<AppState>,
    body: web::Json<TodoSchema>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let task = state
        .tasks
        .create(&user, body.title, body.description, Some(body.state))
        .await?;

    Ok(HttpResponse::Created().json(TodoPublic::from(task)))
}

/// GET /todos/?title&description&state&offset&limit
pub async fn list_todos(
    user: CurrentUser,
    state: web::Data<AppState>,
    query: web::Query<FilterTodo>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    query.validate()?;

    let filter = TaskFilter::from(query);
    let tasks = state.tasks.list(&user, &filter).await?;

    Ok(HttpResponse::Ok().json(TodoList {
        todos: tasks.into_iter().map(TodoPublic::from).collect(),
    }))
}

/// PATCH /todos/{todo_id}
pub async fn patch_todo(
    user: CurrentUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<TodoUpdate>,
) -> AppResult<HttpResponse> {
    let task = state
        .tasks
        .update(&user, path.into_inner(), body.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(TodoPublic::from(task)))
}

/// DELETE /todos/{todo_id}
pub async fn delete_todo(
    user: CurrentUser,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state.tasks.delete(&user, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(Message::new("Task has been deleted successfully")))
}
