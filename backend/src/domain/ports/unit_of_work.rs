//! Driven port bounding Todo repository calls in one transaction.
//!
//! A unit of work checks out one storage session, lends a
//! [`TodoRepository`] bound to it to the caller's closure, then commits when
//! the closure returns `Ok` and rolls back when it returns `Err`. The
//! closure's error is handed back unchanged. Dropping the returned future
//! before completion never commits.

use std::future::Future;

use futures_util::future::BoxFuture;

use super::{TodoRepository, TodoRepositoryError};

/// Boxed future returned by unit-of-work closures.
///
/// The future may borrow the repository for `'r`.
pub type WorkFuture<'r, T, E> = BoxFuture<'r, Result<T, E>>;

/// Transactional session wrapper for the Todo repository.
///
/// # Examples
/// ```ignore
/// use futures_util::FutureExt;
///
/// let todo = unit_of_work
///     .run::<_, Error, _>(move |repo| async move { Ok(repo.create(&todo).await?) }.boxed())
///     .await?;
/// ```
pub trait TodoUnitOfWork: Send + Sync {
    /// Run `work` inside a single transaction.
    ///
    /// Infrastructure failures (checkout, begin, commit) are reported through
    /// `E::from(TodoRepositoryError)`.
    fn run<T, E, F>(&self, work: F) -> impl Future<Output = Result<T, E>> + Send
    where
        T: Send + 'static,
        E: From<TodoRepositoryError> + Send + 'static,
        F: for<'r> FnOnce(&'r dyn TodoRepository) -> WorkFuture<'r, T, E> + Send + 'static;
}

/// Unit of work that hands every closure the same repository without any
/// transaction boundary. Used to drive use cases against mocks.
#[cfg(test)]
pub struct PassThroughUnitOfWork {
    repository: std::sync::Arc<dyn TodoRepository>,
}

#[cfg(test)]
impl PassThroughUnitOfWork {
    pub fn new(repository: impl TodoRepository + 'static) -> Self {
        Self {
            repository: std::sync::Arc::new(repository),
        }
    }
}

#[cfg(test)]
impl TodoUnitOfWork for PassThroughUnitOfWork {
    fn run<T, E, F>(&self, work: F) -> impl Future<Output = Result<T, E>> + Send
    where
        T: Send + 'static,
        E: From<TodoRepositoryError> + Send + 'static,
        F: for<'r> FnOnce(&'r dyn TodoRepository) -> WorkFuture<'r, T, E> + Send + 'static,
    {
        let repository = std::sync::Arc::clone(&self.repository);
        async move { work(repository.as_ref()).await }
    }
}
