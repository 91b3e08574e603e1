//! To-do CRUD handlers.
//!
//! All handlers act on the caller's own todos. Ids that do not parse, do not
//! exist, or belong to another user all answer 404.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use tutorial_core::{TodoId, TodoTitle, UserId};

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::{NewTodo, Todo, TodoChanges};
use crate::state::AppState;

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

/// Body of `POST /todos/` and `PUT /todos/{pk}`.
///
/// `completed` is ignored if sent; use the complete endpoint instead.
#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub important: bool,
}

impl TodoRequest {
    fn validate(self) -> Result<NewTodo> {
        Ok(NewTodo {
            title: parse_title(&self.title)?,
            memo: self.memo,
            important: self.important,
        })
    }
}

/// Body of `PATCH /todos/{pk}`.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPatchRequest {
    pub title: Option<String>,
    pub memo: Option<String>,
    pub important: Option<bool>,
}

impl TodoPatchRequest {
    fn validate(self) -> Result<TodoChanges> {
        Ok(TodoChanges {
            title: self.title.as_deref().map(parse_title).transpose()?,
            memo: self.memo,
            important: self.important,
        })
    }
}

/// List the caller's todos, newest first.
///
/// # Errors
///
/// Returns `AppError::Database` if the todos cannot be read.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<Todo>>> {
    Ok(Json(state.todos().list(user.id).await?))
}

/// Create a todo.
///
/// # Errors
///
/// 400 for a malformed body or an invalid title.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    body: JsonBody<TodoRequest>,
) -> Result<(StatusCode, Json<Todo>)> {
    let new_todo = json_body(body)?.validate()?;
    let todo = state.todos().create(user.id, new_todo).await?;
    tracing::info!(todo_id = %todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Show one todo.
///
/// # Errors
///
/// 404 if the caller has no such todo.
#[instrument(skip_all, fields(user_id = %user.id, pk = %pk))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(pk): Path<String>,
) -> Result<Json<Todo>> {
    let id = parse_pk(&pk)?;
    let todo = state.todos().get(user.id, id).await?;
    todo.map(Json).ok_or(AppError::NotFound)
}

/// Replace every editable field of a todo.
///
/// # Errors
///
/// 404 if the caller has no such todo, 400 for an invalid body.
#[instrument(skip_all, fields(user_id = %user.id, pk = %pk))]
pub async fn replace(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(pk): Path<String>,
    body: JsonBody<TodoRequest>,
) -> Result<Json<Todo>> {
    let id = parse_pk(&pk)?;
    let changes = TodoChanges::replace_all(json_body(body)?.validate()?);
    update(&state, user.id, id, changes).await
}

/// Change only the fields present in the body.
///
/// # Errors
///
/// 404 if the caller has no such todo, 400 for an invalid body.
#[instrument(skip_all, fields(user_id = %user.id, pk = %pk))]
pub async fn patch(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(pk): Path<String>,
    body: JsonBody<TodoPatchRequest>,
) -> Result<Json<Todo>> {
    let id = parse_pk(&pk)?;
    let changes = json_body(body)?.validate()?;
    update(&state, user.id, id, changes).await
}

/// Delete a todo.
///
/// # Errors
///
/// 404 if the caller has no such todo.
#[instrument(skip_all, fields(user_id = %user.id, pk = %pk))]
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(pk): Path<String>,
) -> Result<StatusCode> {
    let id = parse_pk(&pk)?;
    if !state.todos().delete(user.id, id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(todo_id = %id, "Todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Flip a todo between completed and not completed.
///
/// # Errors
///
/// 404 if the caller has no such todo.
#[instrument(skip_all, fields(user_id = %user.id, pk = %pk))]
pub async fn toggle_complete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(pk): Path<String>,
) -> Result<Json<Todo>> {
    let id = parse_pk(&pk)?;
    let todo = state
        .todos()
        .toggle_complete(user.id, id)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(todo_id = %todo.id, completed = todo.completed, "Todo toggled");

    Ok(Json(todo))
}

async fn update(
    state: &AppState,
    owner: UserId,
    id: TodoId,
    changes: TodoChanges,
) -> Result<Json<Todo>> {
    let todo = state
        .todos()
        .update(owner, id, changes)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(todo_id = %todo.id, "Todo updated");

    Ok(Json(todo))
}

fn json_body<T>(body: JsonBody<T>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

fn parse_pk(pk: &str) -> Result<TodoId> {
    pk.parse::<TodoId>().map_err(|_| AppError::NotFound)
}

fn parse_title(title: &str) -> Result<TodoTitle> {
    TodoTitle::parse(title).map_err(|e| AppError::BadRequest(e.to_string()))
}
