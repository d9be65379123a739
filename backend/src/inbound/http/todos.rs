//! Todo API handlers.
//!
//! ```text
//! GET    /api/todos
//! GET    /api/todos/{id}
//! POST   /api/todos {"title":"Buy milk","description":null}
//! PUT    /api/todos/{id} {"title":"Buy oat milk"}
//! PATCH  /api/todos/{id}/complete
//! PATCH  /api/todos/{id}/reopen
//! DELETE /api/todos/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{CreateTodoRequest, TodoView, UpdateTodoRequest};
use crate::domain::{Error, TodoId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{TITLE_FIELD, parse_title, parse_todo_id};

/// Request body for `POST /api/todos`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TodoCreate {
    #[schema(example = "Buy milk", min_length = 1, max_length = 255)]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Two litres, semi-skimmed")]
    pub description: Option<String>,
}

/// Request body for `PUT /api/todos/{id}`. At least one field is required.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct TodoUpdate {
    #[serde(default)]
    #[schema(example = "Buy oat milk", min_length = 1, max_length = 255)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Wire representation of a Todo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TodoResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TodoView> for TodoResponse {
    fn from(view: TodoView) -> Self {
        let TodoView {
            id,
            title,
            description,
            is_completed,
            created_at,
            updated_at,
        } = view;
        Self {
            id,
            title,
            description,
            is_completed,
            created_at,
            updated_at,
        }
    }
}

/// Body of `GET /api/todos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TodoListResponse {
    pub items: Vec<TodoResponse>,
    pub count: usize,
}

fn todo_not_found(id: TodoId) -> Error {
    Error::not_found(format!("todo {id} not found")).with_details(json!({ "id": id.to_string() }))
}

fn found(id: TodoId, view: Option<TodoView>) -> ApiResult<web::Json<TodoResponse>> {
    view.map(|view| web::Json(TodoResponse::from(view)))
        .ok_or_else(|| todo_not_found(id))
}

/// List every Todo, oldest first.
#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "All Todos", body = TodoListResponse),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "listTodos"
)]
#[get("/todos")]
pub async fn list_todos(state: web::Data<HttpState>) -> ApiResult<web::Json<TodoListResponse>> {
    let items: Vec<TodoResponse> = state
        .todos_query
        .list()
        .await?
        .into_iter()
        .map(TodoResponse::from)
        .collect();
    let count = items.len();
    Ok(web::Json(TodoListResponse { items, count }))
}

/// Fetch one Todo.
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = String, Path, format = Uuid, description = "Todo identifier")),
    responses(
        (status = 200, description = "Todo", body = TodoResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Todo not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "getTodo"
)]
#[get("/todos/{id}")]
pub async fn get_todo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TodoResponse>> {
    let id = parse_todo_id(&path)?;
    found(id, state.todos_query.get(id).await?)
}

/// Create a Todo.
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = TodoCreate,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse,
            headers(("Location" = String, description = "URL of the new Todo"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Id already in use", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "createTodo"
)]
#[post("/todos")]
pub async fn create_todo(
    req: HttpRequest,
    state: web::Data<HttpState>,
    payload: web::Json<TodoCreate>,
) -> ApiResult<HttpResponse> {
    let TodoCreate { title, description } = payload.into_inner();
    let request = CreateTodoRequest {
        title: parse_title(title, TITLE_FIELD)?,
        description,
    };
    let created = TodoResponse::from(state.todos.create(request).await?);
    let location = format!("{}/{}", req.path().trim_end_matches('/'), created.id);
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(created))
}

/// Revise a Todo's title and/or description.
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = String, Path, format = Uuid, description = "Todo identifier")),
    request_body = TodoUpdate,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Invalid request or no fields given", body = ErrorSchema),
        (status = 404, description = "Todo not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "updateTodo"
)]
#[put("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<TodoUpdate>,
) -> ApiResult<web::Json<TodoResponse>> {
    let id = parse_todo_id(&path)?;
    let TodoUpdate { title, description } = payload.into_inner();
    let request = UpdateTodoRequest {
        id,
        title: title
            .map(|raw| parse_title(raw, TITLE_FIELD))
            .transpose()?,
        description,
    };
    found(id, state.todos.update(request).await?)
}

/// Mark a Todo completed. Completing a completed Todo is not an error.
#[utoipa::path(
    patch,
    path = "/api/todos/{id}/complete",
    params(("id" = String, Path, format = Uuid, description = "Todo identifier")),
    responses(
        (status = 200, description = "Todo completed", body = TodoResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Todo not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "completeTodo"
)]
#[patch("/todos/{id}/complete")]
pub async fn complete_todo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TodoResponse>> {
    let id = parse_todo_id(&path)?;
    found(id, state.todos.complete(id).await?)
}

/// Mark a Todo open again.
#[utoipa::path(
    patch,
    path = "/api/todos/{id}/reopen",
    params(("id" = String, Path, format = Uuid, description = "Todo identifier")),
    responses(
        (status = 200, description = "Todo reopened", body = TodoResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Todo not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "reopenTodo"
)]
#[patch("/todos/{id}/reopen")]
pub async fn reopen_todo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TodoResponse>> {
    let id = parse_todo_id(&path)?;
    found(id, state.todos.reopen(id).await?)
}

/// Delete a Todo. Deleting an absent Todo also answers 204.
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = String, Path, format = Uuid, description = "Todo identifier")),
    responses(
        (status = 204, description = "Todo deleted or already absent"),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["todos"],
    operation_id = "deleteTodo"
)]
#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_todo_id(&path)?;
    state.todos.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register every Todo handler on a scope or app.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use todo_backend::inbound::http::todos::configure;
///
/// let _app = App::new().service(web::scope("/api").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_todos)
        .service(create_todo)
        .service(get_todo)
        .service(update_todo)
        .service(complete_todo)
        .service(reopen_todo)
        .service(delete_todo);
}
