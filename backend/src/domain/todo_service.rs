//! Todo use cases.
//!
//! [`TodoService`] implements the [`TodoCommand`] and [`TodoQuery`] driving
//! ports. Each use case runs inside exactly one unit of work, so a failure
//! part-way through leaves storage untouched.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CreateTodoRequest, TodoCommand, TodoQuery, TodoRepositoryError, TodoUnitOfWork, TodoView,
    UpdateTodoRequest,
};
use crate::domain::{Error, Todo, TodoId};

impl From<TodoRepositoryError> for Error {
    fn from(error: TodoRepositoryError) -> Self {
        match error {
            TodoRepositoryError::Connection { message } => {
                Self::internal(format!("todo repository unreachable: {message}"))
            }
            TodoRepositoryError::Query { message } => {
                Self::internal(format!("todo repository error: {message}"))
            }
            TodoRepositoryError::Corrupt { message } => {
                Self::internal(format!("stored todo is invalid: {message}"))
            }
            TodoRepositoryError::DuplicateId { id } => {
                Self::conflict(format!("todo {id} already exists")).with_details(json!({
                    "id": id,
                    "code": "duplicate_id",
                }))
            }
            TodoRepositoryError::NotFound { id } => Self::not_found(format!("todo {id} not found")),
        }
    }
}

/// Todo service implementing the driving ports.
pub struct TodoService<U> {
    unit_of_work: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> Clone for TodoService<U> {
    fn clone(&self) -> Self {
        Self {
            unit_of_work: Arc::clone(&self.unit_of_work),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<U> TodoService<U> {
    /// Create a service over the given unit of work.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use todo_backend::domain::TodoService;
    /// use todo_backend::outbound::memory::InMemoryUnitOfWork;
    ///
    /// let service = TodoService::new(Arc::new(InMemoryUnitOfWork::default()), Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(unit_of_work: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            unit_of_work,
            clock,
        }
    }
}

impl<U: TodoUnitOfWork> TodoService<U> {
    /// Fetch a Todo, apply `mutate`, and persist it, all in one unit of work.
    async fn modify<M>(&self, id: TodoId, mutate: M) -> Result<Option<TodoView>, Error>
    where
        M: FnOnce(&mut Todo) + Send + 'static,
    {
        self.unit_of_work
            .run::<_, Error, _>(move |repo| {
                async move {
                    let Some(mut todo) = repo.get_by_id(&id).await? else {
                        return Ok(None);
                    };
                    mutate(&mut todo);
                    let stored = repo.update(&todo).await?;
                    Ok(Some(TodoView::from(stored)))
                }
                .boxed()
            })
            .await
    }
}

#[async_trait]
impl<U: TodoUnitOfWork> TodoQuery for TodoService<U> {
    async fn list(&self) -> Result<Vec<TodoView>, Error> {
        let todos = self
            .unit_of_work
            .run::<_, Error, _>(|repo| async move { Ok(repo.get_all().await?) }.boxed())
            .await?;
        Ok(todos.iter().map(TodoView::from).collect())
    }

    async fn get(&self, id: TodoId) -> Result<Option<TodoView>, Error> {
        let todo = self
            .unit_of_work
            .run::<_, Error, _>(move |repo| async move { Ok(repo.get_by_id(&id).await?) }.boxed())
            .await?;
        Ok(todo.map(TodoView::from))
    }
}

#[async_trait]
impl<U: TodoUnitOfWork> TodoCommand for TodoService<U> {
    async fn create(&self, request: CreateTodoRequest) -> Result<TodoView, Error> {
        let CreateTodoRequest { title, description } = request;
        let todo = Todo::create(title, description, self.clock.utc());
        let stored = self
            .unit_of_work
            .run::<_, Error, _>(move |repo| async move { Ok(repo.create(&todo).await?) }.boxed())
            .await?;
        info!(todo_id = %stored.id(), "todo created");
        Ok(TodoView::from(stored))
    }

    async fn update(&self, request: UpdateTodoRequest) -> Result<Option<TodoView>, Error> {
        if request.is_empty() {
            return Err(Error::invalid_request(
                "at least one of title or description must be provided",
            )
            .with_details(json!({
                "fields": ["title", "description"],
                "code": "no_fields",
            })));
        }
        let UpdateTodoRequest {
            id,
            title,
            description,
        } = request;
        let now = self.clock.utc();
        let updated = self
            .modify(id, move |todo| todo.revise(title, description, now))
            .await?;
        log_outcome(id, updated.is_some(), "todo updated");
        Ok(updated)
    }

    async fn complete(&self, id: TodoId) -> Result<Option<TodoView>, Error> {
        let now = self.clock.utc();
        let updated = self.modify(id, move |todo| todo.complete(now)).await?;
        log_outcome(id, updated.is_some(), "todo completed");
        Ok(updated)
    }

    async fn reopen(&self, id: TodoId) -> Result<Option<TodoView>, Error> {
        let now = self.clock.utc();
        let updated = self.modify(id, move |todo| todo.reopen(now)).await?;
        log_outcome(id, updated.is_some(), "todo reopened");
        Ok(updated)
    }

    async fn delete(&self, id: TodoId) -> Result<bool, Error> {
        let removed = self
            .unit_of_work
            .run::<_, Error, _>(move |repo| async move { Ok(repo.delete(&id).await?) }.boxed())
            .await?;
        log_outcome(id, removed, "todo deleted");
        Ok(removed)
    }
}

fn log_outcome(id: TodoId, found: bool, message: &'static str) {
    if found {
        info!(todo_id = %id, "{message}");
    } else {
        debug!(todo_id = %id, "todo not found");
    }
}

#[cfg(test)]
#[path = "todo_service_tests.rs"]
mod tests;
