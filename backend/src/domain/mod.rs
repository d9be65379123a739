//! Domain primitives, aggregates, and use cases.
//!
//! Purpose: hold the Todo model and its business rules independent of HTTP
//! and storage concerns. Adapters depend on this module; it depends on none
//! of them.
//!
//! Public surface:
//! - `Todo`, `TodoId`, `TodoTitle`: the aggregate and its validated fields.
//! - `TodoService`: use cases implementing the driving ports.
//! - `Error`, `ErrorCode`: transport-agnostic failures.
//! - `TraceId`: request correlation identifier.

pub mod error;
pub mod ports;
pub mod todo;
pub mod todo_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::todo::{TODO_TITLE_MAX, Todo, TodoDraft, TodoId, TodoTitle, TodoValidationError};
pub use self::todo_service::TodoService;
pub use self::trace_id::TraceId;
