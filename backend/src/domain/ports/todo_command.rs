//! Driving port for changing Todos.
//!
//! Absence is reported as `None`/`false` rather than an error so inbound
//! adapters decide how to surface it.

use async_trait::async_trait;

use crate::domain::{Error, TodoId, TodoTitle};

use super::TodoView;

/// Request to create a Todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodoRequest {
    pub title: TodoTitle,
    pub description: Option<String>,
}

/// Request to revise a Todo. At least one field must be provided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTodoRequest {
    pub id: TodoId,
    pub title: Option<TodoTitle>,
    pub description: Option<String>,
}

impl UpdateTodoRequest {
    /// Whether the request changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Write-side Todo use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoCommand: Send + Sync {
    /// Create a new open Todo.
    async fn create(&self, request: CreateTodoRequest) -> Result<TodoView, Error>;

    /// Apply the provided fields to an existing Todo.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error when the request has no fields.
    async fn update(&self, request: UpdateTodoRequest) -> Result<Option<TodoView>, Error>;

    /// Mark a Todo completed.
    async fn complete(&self, id: TodoId) -> Result<Option<TodoView>, Error>;

    /// Mark a completed Todo open again.
    async fn reopen(&self, id: TodoId) -> Result<Option<TodoView>, Error>;

    /// Delete a Todo, reporting whether it existed.
    async fn delete(&self, id: TodoId) -> Result<bool, Error>;
}
