//! Driving port for reading Todos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, Todo, TodoId};

/// Output representation of a Todo returned by the use cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        Self {
            id: *todo.id(),
            title: todo.title().to_string(),
            description: todo.description().map(str::to_owned),
            is_completed: todo.is_completed(),
            created_at: todo.created_at(),
            updated_at: todo.updated_at(),
        }
    }
}

impl From<Todo> for TodoView {
    fn from(todo: Todo) -> Self {
        Self::from(&todo)
    }
}

/// Read-side Todo use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoQuery: Send + Sync {
    /// List every Todo ordered by creation time.
    async fn list(&self) -> Result<Vec<TodoView>, Error>;

    /// Fetch one Todo; `None` when it does not exist.
    async fn get(&self, id: TodoId) -> Result<Option<TodoView>, Error>;
}
