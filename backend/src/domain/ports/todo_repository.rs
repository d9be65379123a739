//! Driven port for Todo persistence.
//!
//! Implementations are bound to a single storage session; the
//! [`super::TodoUnitOfWork`] port decides when that session commits.

use async_trait::async_trait;

use crate::domain::{Todo, TodoId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by Todo repository adapters.
    pub enum TodoRepositoryError {
        /// The store could not be reached or the connection dropped.
        Connection { message: String } => "todo repository connection failed: {message}",
        /// A statement failed to execute.
        Query { message: String } => "todo repository query failed: {message}",
        /// A Todo with the same id already exists.
        DuplicateId { id: String } => "todo {id} already exists",
        /// An update targeted a Todo that does not exist.
        NotFound { id: String } => "todo {id} not found",
        /// A stored row violates the Todo invariants.
        Corrupt { message: String } => "stored todo is invalid: {message}",
    }
}

/// Storage contract consumed by the Todo use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Return every stored Todo ordered by `created_at`, then `id`.
    async fn get_all(&self) -> Result<Vec<Todo>, TodoRepositoryError>;

    /// Fetch a Todo, returning `None` when it does not exist.
    async fn get_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoRepositoryError>;

    /// Insert a new Todo and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`TodoRepositoryError::DuplicateId`] when the id is taken.
    async fn create(&self, todo: &Todo) -> Result<Todo, TodoRepositoryError>;

    /// Overwrite an existing Todo and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`TodoRepositoryError::NotFound`] when no row has the id.
    async fn update(&self, todo: &Todo) -> Result<Todo, TodoRepositoryError>;

    /// Delete a Todo, reporting whether a row was removed.
    async fn delete(&self, id: &TodoId) -> Result<bool, TodoRepositoryError>;
}
