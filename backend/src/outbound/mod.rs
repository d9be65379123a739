//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL via Diesel, used in deployments.
//! - **memory**: process-local store for tests and database-free runs.
//!
//! Adapters translate between domain types and their storage representation
//! and contain no business rules.

pub mod memory;
pub mod persistence;
