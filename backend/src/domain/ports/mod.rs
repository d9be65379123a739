//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`TodoRepository`], [`TodoUnitOfWork`]) are implemented by
//! outbound adapters; driving ports ([`TodoCommand`], [`TodoQuery`]) are
//! implemented by the domain service and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod todo_command;
mod todo_query;
mod todo_repository;
mod unit_of_work;

#[cfg(test)]
pub use todo_command::MockTodoCommand;
pub use todo_command::{CreateTodoRequest, TodoCommand, UpdateTodoRequest};
#[cfg(test)]
pub use todo_query::MockTodoQuery;
pub use todo_query::{TodoQuery, TodoView};
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{TodoRepository, TodoRepositoryError};
#[cfg(test)]
pub use unit_of_work::PassThroughUnitOfWork;
pub use unit_of_work::{TodoUnitOfWork, WorkFuture};
