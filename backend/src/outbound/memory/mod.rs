//! Process-local Todo store.
//!
//! Implements the same driven ports as the PostgreSQL adapter with the same
//! transactional behaviour: a unit of work stages its changes on a private
//! copy and publishes them only on success. Units of work are serialised by
//! an async mutex, giving serialisable isolation.

mod todo_store;

pub use todo_store::{InMemoryTodoRepository, InMemoryUnitOfWork};
