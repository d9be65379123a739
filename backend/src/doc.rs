//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the schema wrappers for
//! domain types. The document backs Swagger UI in debug builds and is
//! exported by `cargo run --bin openapi-dump`.

use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::todos::{TodoCreate, TodoListResponse, TodoResponse, TodoUpdate};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo backend API",
        description = "CRUD interface for Todo items plus health checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::todos::list_todos,
        crate::inbound::http::todos::get_todo,
        crate::inbound::http::todos::create_todo,
        crate::inbound::http::todos::update_todo,
        crate::inbound::http::todos::complete_todo,
        crate::inbound::http::todos::reopen_todo,
        crate::inbound::http::todos::delete_todo,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        TodoCreate,
        TodoUpdate,
        TodoResponse,
        TodoListResponse,
        HealthStatus,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "todos", description = "Create, read, update and delete Todos"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
