//! Transactional unit of work over the PostgreSQL pool.
//!
//! Each [`DieselUnitOfWork::run`] checks out its own connection, opens a
//! transaction, and lends a [`DieselTodoRepository`] bound to it. The
//! connection goes back to the pool when the run finishes, whether it
//! committed or rolled back.

use std::future::Future;

use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::debug;

use crate::domain::ports::{TodoRepository, TodoRepositoryError, TodoUnitOfWork, WorkFuture};

use super::diesel_todo_repository::{TransactionFailure, map_pool_error};
use super::{DbPool, DieselTodoRepository};

/// Unit of work backed by a Diesel connection pool.
///
/// # Examples
///
/// ```rust,no_run
/// use todo_backend::outbound::persistence::{DbPool, DieselUnitOfWork, PoolConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/todo")).await?;
/// let unit_of_work = DieselUnitOfWork::new(pool);
/// # let _ = unit_of_work;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DieselUnitOfWork {
    pool: DbPool,
}

impl DieselUnitOfWork {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Like [`TodoUnitOfWork::run`], but lends the concrete repository so the
    /// closure can open savepoints with [`DieselTodoRepository::savepoint`].
    pub async fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send,
        E: From<TodoRepositoryError> + Send,
        F: for<'r, 'c> FnOnce(&'r DieselTodoRepository<'c>) -> WorkFuture<'r, T, E> + Send,
    {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| E::from(map_pool_error(err)))?;

        let outcome = conn
            .transaction::<T, TransactionFailure<E>, _>(|conn| {
                async move {
                    let repository = DieselTodoRepository::new(conn);
                    work(&repository).await.map_err(TransactionFailure::Work)
                }
                .scope_boxed()
            })
            .await;

        if outcome.is_err() {
            debug!("todo transaction rolled back");
        }
        outcome.map_err(TransactionFailure::into_error)
    }
}

impl TodoUnitOfWork for DieselUnitOfWork {
    fn run<T, E, F>(&self, work: F) -> impl Future<Output = Result<T, E>> + Send
    where
        T: Send + 'static,
        E: From<TodoRepositoryError> + Send + 'static,
        F: for<'r> FnOnce(&'r dyn TodoRepository) -> WorkFuture<'r, T, E> + Send + 'static,
    {
        self.run_in_transaction(move |repository| work(repository))
    }
}
