//! To-do repositories.
//!
//! Every operation is scoped to an owner: a todo that belongs to someone
//! else behaves exactly like one that does not exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use tutorial_core::{TodoId, TodoTitle, UserId};

use super::{RepositoryError, next_id};
use crate::models::{NewTodo, Todo, TodoChanges};

/// Storage for to-do items.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// The owner's todos, newest first.
    async fn list(&self, owner: UserId) -> Result<Vec<Todo>, RepositoryError>;

    /// One of the owner's todos.
    async fn get(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, RepositoryError>;

    /// Store a new, not completed todo.
    async fn create(&self, owner: UserId, todo: NewTodo) -> Result<Todo, RepositoryError>;

    /// Overwrite fields of one of the owner's todos.
    async fn update(
        &self,
        owner: UserId,
        id: TodoId,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, RepositoryError>;

    /// Flip the completed flag of one of the owner's todos.
    async fn toggle_complete(
        &self,
        owner: UserId,
        id: TodoId,
    ) -> Result<Option<Todo>, RepositoryError>;

    /// Delete one of the owner's todos. Returns false if there was none.
    async fn delete(&self, owner: UserId, id: TodoId) -> Result<bool, RepositoryError>;
}

// =============================================================================
// In-memory todos
// =============================================================================

/// Todos held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(
        &self,
        owner: UserId,
        id: TodoId,
        change: F,
    ) -> Result<Option<Todo>, RepositoryError>
    where
        F: FnOnce(&mut Todo) + Send,
    {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter_mut()
            .find(|t| t.id == id && t.owner == owner)
            .map(|todo| {
                change(todo);
                todo.clone()
            }))
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self, owner: UserId) -> Result<Vec<Todo>, RepositoryError> {
        let mut todos: Vec<Todo> = self
            .todos
            .read()
            .await
            .iter()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect();

        todos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(todos)
    }

    async fn get(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, RepositoryError> {
        Ok(self
            .todos
            .read()
            .await
            .iter()
            .find(|t| t.id == id && t.owner == owner)
            .cloned())
    }

    async fn create(&self, owner: UserId, todo: NewTodo) -> Result<Todo, RepositoryError> {
        let mut todos = self.todos.write().await;

        let id = next_id(todos.iter().map(|t| t.id.as_i32()))?;
        let todo = Todo {
            id: TodoId::new(id),
            owner,
            title: todo.title,
            memo: todo.memo,
            created_at: Utc::now(),
            completed: false,
            important: todo.important,
        };
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(
        &self,
        owner: UserId,
        id: TodoId,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, RepositoryError> {
        self.modify(owner, id, |todo| changes.apply(todo)).await
    }

    async fn toggle_complete(
        &self,
        owner: UserId,
        id: TodoId,
    ) -> Result<Option<Todo>, RepositoryError> {
        self.modify(owner, id, |todo| todo.completed = !todo.completed)
            .await
    }

    async fn delete(&self, owner: UserId, id: TodoId) -> Result<bool, RepositoryError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| !(t.id == id && t.owner == owner));
        Ok(todos.len() < before)
    }
}

// =============================================================================
// PostgreSQL todos
// =============================================================================

const TODO_COLUMNS: &str = "id, owner_id, title, memo, created_at, completed, important";

#[derive(Debug, FromRow)]
struct TodoRow {
    id: i32,
    owner_id: i32,
    title: String,
    memo: String,
    created_at: DateTime<Utc>,
    completed: bool,
    important: bool,
}

impl TryFrom<TodoRow> for Todo {
    type Error = RepositoryError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let title = TodoTitle::parse(&row.title).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid title for todo {}: {e}", row.id))
        })?;

        Ok(Self {
            id: TodoId::new(row.id),
            owner: UserId::new(row.owner_id),
            title,
            memo: row.memo,
            created_at: row.created_at,
            completed: row.completed,
            important: row.important,
        })
    }
}

/// Todos stored in the `todos` table.
#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self, owner: UserId) -> Result<Vec<Todo>, RepositoryError> {
        let rows: Vec<TodoRow> = sqlx::query_as(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn get(&self, owner: UserId, id: TodoId) -> Result<Option<Todo>, RepositoryError> {
        let row: Option<TodoRow> = sqlx::query_as(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    async fn create(&self, owner: UserId, todo: NewTodo) -> Result<Todo, RepositoryError> {
        let row: TodoRow = sqlx::query_as(&format!(
            r"
            INSERT INTO todos (owner_id, title, memo, important)
            VALUES ($1, $2, $3, $4)
            RETURNING {TODO_COLUMNS}
            "
        ))
        .bind(owner)
        .bind(todo.title.as_str())
        .bind(&todo.memo)
        .bind(todo.important)
        .fetch_one(&self.pool)
        .await?;

        Todo::try_from(row)
    }

    async fn update(
        &self,
        owner: UserId,
        id: TodoId,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, RepositoryError> {
        let row: Option<TodoRow> = sqlx::query_as(&format!(
            r"
            UPDATE todos
            SET title = COALESCE($3, title),
                memo = COALESCE($4, memo),
                important = COALESCE($5, important)
            WHERE id = $1 AND owner_id = $2
            RETURNING {TODO_COLUMNS}
            "
        ))
        .bind(id)
        .bind(owner)
        .bind(changes.title.as_ref().map(TodoTitle::as_str))
        .bind(changes.memo.as_deref())
        .bind(changes.important)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    async fn toggle_complete(
        &self,
        owner: UserId,
        id: TodoId,
    ) -> Result<Option<Todo>, RepositoryError> {
        let row: Option<TodoRow> = sqlx::query_as(&format!(
            r"
            UPDATE todos
            SET completed = NOT completed
            WHERE id = $1 AND owner_id = $2
            RETURNING {TODO_COLUMNS}
            "
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Todo::try_from).transpose()
    }

    async fn delete(&self, owner: UserId, id: TodoId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    fn new_todo(title: &str) -> NewTodo {
        NewTodo {
            title: TodoTitle::parse(title).unwrap(),
            memo: String::new(),
            important: false,
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_per_owner() {
        let repo = InMemoryTodoRepository::new();
        repo.create(ALICE, new_todo("first")).await.unwrap();
        repo.create(BOB, new_todo("not mine")).await.unwrap();
        repo.create(ALICE, new_todo("second")).await.unwrap();

        let titles: Vec<_> = repo
            .list(ALICE)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title.to_string())
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_new_todo_is_not_completed() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo.create(ALICE, new_todo("task")).await.unwrap();
        assert!(!todo.completed);
        assert_eq!(todo.id, TodoId::new(1));
    }

    #[tokio::test]
    async fn test_toggle_flips_back_and_forth() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo.create(ALICE, new_todo("task")).await.unwrap();

        let once = repo.toggle_complete(ALICE, todo.id).await.unwrap().unwrap();
        assert!(once.completed);
        let twice = repo.toggle_complete(ALICE, todo.id).await.unwrap().unwrap();
        assert!(!twice.completed);
    }

    #[tokio::test]
    async fn test_other_owner_cannot_touch_todo() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo.create(ALICE, new_todo("private")).await.unwrap();

        assert!(repo.get(BOB, todo.id).await.unwrap().is_none());
        assert!(repo.toggle_complete(BOB, todo.id).await.unwrap().is_none());
        assert!(
            repo.update(BOB, todo.id, TodoChanges::default())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!repo.delete(BOB, todo.id).await.unwrap());
        assert!(repo.get(ALICE, todo.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_removes_todo() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo.create(ALICE, new_todo("task")).await.unwrap();

        assert!(repo.delete(ALICE, todo.id).await.unwrap());
        assert!(!repo.delete(ALICE, todo.id).await.unwrap());
        assert!(repo.list(ALICE).await.unwrap().is_empty());
    }
}
