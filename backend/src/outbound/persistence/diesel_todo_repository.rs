//! PostgreSQL-backed Todo repository.
//!
//! A [`DieselTodoRepository`] borrows the connection of the transaction that
//! [`super::DieselUnitOfWork`] opened, so every call it makes joins that
//! transaction. Inserts and updates use `RETURNING` so the entity handed back
//! is exactly what the database stored.

use async_trait::async_trait;
use diesel::OptionalExtension;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{TodoRepository, TodoRepositoryError, WorkFuture};
use crate::domain::{Todo, TodoId};

use super::models::{NewTodoRow, TodoRow, TodoUpdate};
use super::pool::PoolError;
use super::schema::todos;

/// Map pool errors to repository connection errors.
pub(super) fn map_pool_error(error: PoolError) -> TodoRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TodoRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to repository errors.
pub(super) fn map_diesel_error(error: diesel::result::Error) -> TodoRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    let error_message = error.to_string();
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error_message,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            TodoRepositoryError::connection(info.message().to_owned())
        }
        DieselError::BrokenTransactionManager => {
            TodoRepositoryError::connection("transaction manager is broken")
        }
        DieselError::DatabaseError(_, info) => TodoRepositoryError::query(info.message().to_owned()),
        _ => TodoRepositoryError::query(error_message),
    }
}

fn map_insert_error(error: diesel::result::Error, id: &TodoId) -> TodoRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            debug!(todo_id = %id, "todo insert hit an existing id");
            TodoRepositoryError::duplicate_id(id.to_string())
        }
        other => map_diesel_error(other),
    }
}

fn row_to_todo(row: TodoRow) -> Result<Todo, TodoRepositoryError> {
    let id = row.id;
    Todo::try_from(row)
        .map_err(|err| TodoRepositoryError::corrupt(format!("todo {id}: {err}")))
}

/// Errors surfaced from a Diesel transaction closure.
///
/// Keeps the caller's error intact so it can be returned unchanged after the
/// rollback, while still letting Diesel report its own failures.
#[derive(Debug)]
pub(super) enum TransactionFailure<E> {
    Work(E),
    Storage(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for TransactionFailure<E> {
    fn from(error: diesel::result::Error) -> Self {
        Self::Storage(error)
    }
}

impl<E: From<TodoRepositoryError>> TransactionFailure<E> {
    pub(super) fn into_error(self) -> E {
        match self {
            Self::Work(error) => error,
            Self::Storage(error) => E::from(map_diesel_error(error)),
        }
    }
}

/// Todo repository bound to one open transaction.
pub struct DieselTodoRepository<'c> {
    conn: Mutex<&'c mut AsyncPgConnection>,
}

impl<'c> DieselTodoRepository<'c> {
    /// Wrap a connection that already has a transaction open.
    pub fn new(conn: &'c mut AsyncPgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run `work` inside a savepoint on the current transaction.
    ///
    /// When `work` fails, changes made since the savepoint are rolled back and
    /// the error is returned; the enclosing transaction stays usable so the
    /// caller may recover or propagate. The connection is held exclusively
    /// for the duration, so `work` must only use the repository it is given.
    pub async fn savepoint<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send,
        E: From<TodoRepositoryError> + Send,
        F: for<'r, 's> FnOnce(&'r DieselTodoRepository<'s>) -> WorkFuture<'r, T, E> + Send,
    {
        let mut conn = self.conn.lock().await;
        (**conn)
            .transaction::<T, TransactionFailure<E>, _>(|conn| {
                async move {
                    let nested = DieselTodoRepository::new(conn);
                    work(&nested).await.map_err(TransactionFailure::Work)
                }
                .scope_boxed()
            })
            .await
            .map_err(TransactionFailure::into_error)
    }
}

#[async_trait]
impl TodoRepository for DieselTodoRepository<'_> {
    async fn get_all(&self) -> Result<Vec<Todo>, TodoRepositoryError> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<TodoRow> = todos::table
            .order((todos::created_at.asc(), todos::id.asc()))
            .select(TodoRow::as_select())
            .load(&mut **conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn get_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoRepositoryError> {
        let mut conn = self.conn.lock().await;
        let row: Option<TodoRow> = todos::table
            .find(*id.as_uuid())
            .select(TodoRow::as_select())
            .first(&mut **conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_todo).transpose()
    }

    async fn create(&self, todo: &Todo) -> Result<Todo, TodoRepositoryError> {
        let mut conn = self.conn.lock().await;
        let row: TodoRow = diesel::insert_into(todos::table)
            .values(NewTodoRow::from(todo))
            .returning(TodoRow::as_returning())
            .get_result(&mut **conn)
            .await
            .map_err(|err| map_insert_error(err, todo.id()))?;
        row_to_todo(row)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, TodoRepositoryError> {
        let mut conn = self.conn.lock().await;
        let row: Option<TodoRow> = diesel::update(todos::table.find(*todo.id().as_uuid()))
            .set(TodoUpdate::from(todo))
            .returning(TodoRow::as_returning())
            .get_result(&mut **conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => row_to_todo(row),
            None => Err(TodoRepositoryError::not_found(todo.id().to_string())),
        }
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, TodoRepositoryError> {
        let mut conn = self.conn.lock().await;
        let removed = diesel::delete(todos::table.find(*id.as_uuid()))
            .execute(&mut **conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
