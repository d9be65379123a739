//! In-memory unit of work and repository for Todos.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{TodoRepository, TodoRepositoryError, TodoUnitOfWork, WorkFuture};
use crate::domain::{Todo, TodoId};

type TodoTable = BTreeMap<TodoId, Todo>;

/// Unit of work over a shared in-memory table.
///
/// Clones share the same table.
///
/// # Examples
/// ```
/// use futures_util::FutureExt;
/// use todo_backend::domain::ports::{TodoRepositoryError, TodoUnitOfWork};
/// use todo_backend::outbound::memory::InMemoryUnitOfWork;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let unit_of_work = InMemoryUnitOfWork::default();
/// let todos = unit_of_work
///     .run::<_, TodoRepositoryError, _>(|repo| async move { repo.get_all().await }.boxed())
///     .await
///     .expect("empty store lists");
/// assert!(todos.is_empty());
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryUnitOfWork {
    committed: Arc<Mutex<TodoTable>>,
}

impl InMemoryUnitOfWork {
    /// Create a store pre-populated with `todos`.
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let table = todos.into_iter().map(|todo| (*todo.id(), todo)).collect();
        Self {
            committed: Arc::new(Mutex::new(table)),
        }
    }

    /// Committed Todos ordered by `created_at`, then `id`.
    pub async fn committed(&self) -> Vec<Todo> {
        ordered(&*self.committed.lock().await)
    }

    /// Like [`TodoUnitOfWork::run`], but lends the concrete repository so the
    /// closure can open savepoints with [`InMemoryTodoRepository::savepoint`].
    pub async fn run_in_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        T: Send,
        E: Send,
        F: for<'r> FnOnce(&'r InMemoryTodoRepository) -> WorkFuture<'r, T, E> + Send,
    {
        let mut committed = self.committed.lock().await;
        let session = InMemoryTodoRepository::staged(committed.clone());
        let outcome = work(&session).await;
        if outcome.is_ok() {
            *committed = session.into_table();
        } else {
            debug!("in-memory todo transaction rolled back");
        }
        outcome
    }
}

impl TodoUnitOfWork for InMemoryUnitOfWork {
    fn run<T, E, F>(&self, work: F) -> impl Future<Output = Result<T, E>> + Send
    where
        T: Send + 'static,
        E: From<TodoRepositoryError> + Send + 'static,
        F: for<'r> FnOnce(&'r dyn TodoRepository) -> WorkFuture<'r, T, E> + Send + 'static,
    {
        self.run_in_transaction(move |repository| work(repository))
    }
}

/// Repository over the staged copy of one unit of work.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    staged: std::sync::Mutex<TodoTable>,
}

impl InMemoryTodoRepository {
    fn staged(table: TodoTable) -> Self {
        Self {
            staged: std::sync::Mutex::new(table),
        }
    }

    fn table(&self) -> MutexGuard<'_, TodoTable> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn into_table(self) -> TodoTable {
        self.staged
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `work` with a savepoint on the staged copy.
    ///
    /// When `work` fails, changes made since the savepoint are discarded and
    /// the error is returned; earlier staged changes survive.
    pub async fn savepoint<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'r> FnOnce(&'r Self) -> WorkFuture<'r, T, E>,
    {
        let snapshot = self.table().clone();
        let outcome = work(self).await;
        if outcome.is_err() {
            *self.table() = snapshot;
        }
        outcome
    }
}

fn ordered(table: &TodoTable) -> Vec<Todo> {
    let mut todos: Vec<Todo> = table.values().cloned().collect();
    todos.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
    todos
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn get_all(&self) -> Result<Vec<Todo>, TodoRepositoryError> {
        Ok(ordered(&self.table()))
    }

    async fn get_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoRepositoryError> {
        Ok(self.table().get(id).cloned())
    }

    async fn create(&self, todo: &Todo) -> Result<Todo, TodoRepositoryError> {
        let mut table = self.table();
        if table.contains_key(todo.id()) {
            return Err(TodoRepositoryError::duplicate_id(todo.id().to_string()));
        }
        table.insert(*todo.id(), todo.clone());
        Ok(todo.clone())
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, TodoRepositoryError> {
        let mut table = self.table();
        match table.get_mut(todo.id()) {
            Some(stored) => {
                *stored = todo.clone();
                Ok(todo.clone())
            }
            None => Err(TodoRepositoryError::not_found(todo.id().to_string())),
        }
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, TodoRepositoryError> {
        Ok(self.table().remove(id).is_some())
    }
}
