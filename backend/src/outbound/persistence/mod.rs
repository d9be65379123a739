//! PostgreSQL persistence adapter using Diesel.
//!
//! Implements the Todo driven ports on top of `diesel-async` and a `bb8`
//! pool:
//!
//! - [`DieselUnitOfWork`] checks out one connection per unit of work and
//!   wraps it in a transaction.
//! - [`DieselTodoRepository`] issues the statements for that transaction and
//!   translates rows to domain entities.
//! - [`migrations`] embeds and applies the schema.
//!
//! Row structs (`models.rs`) and the table definition (`schema.rs`) never
//! leave this module.

mod diesel_todo_repository;
mod diesel_unit_of_work;
pub mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_todo_repository::DieselTodoRepository;
pub use diesel_unit_of_work::DieselUnitOfWork;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
