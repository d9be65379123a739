//! End-to-end HTTP scenarios against the in-memory store.
//!
//! Builds the app from the library's public handlers the same way the server
//! binary does, then drives it with `actix_web::test`.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};
use todo_backend::Trace;
use todo_backend::domain::TodoService;
use todo_backend::inbound::http::health::health;
use todo_backend::inbound::http::json_config;
use todo_backend::inbound::http::state::HttpState;
use todo_backend::inbound::http::todos::{TodoListResponse, TodoResponse, configure};
use todo_backend::outbound::memory::InMemoryUnitOfWork;

fn app(
    store: InMemoryUnitOfWork,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let service = Arc::new(TodoService::new(Arc::new(store), Arc::new(DefaultClock)));
    App::new()
        .app_data(web::Data::new(HttpState::new(service.clone(), service)))
        .app_data(json_config())
        .wrap(Trace)
        .service(health)
        .service(web::scope("/api").configure(configure))
}

#[actix_web::test]
async fn todo_lifecycle_scenario() {
    let app = test::init_service(app(InMemoryUnitOfWork::default())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "Buy milk" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(response).await;
    assert_eq!(created.get("is_completed"), Some(&json!(false)));
    assert_eq!(created.get("description"), Some(&Value::Null));
    let id = created
        .get("id")
        .and_then(Value::as_str)
        .expect("id is a string")
        .to_owned();
    let uri = format!("/api/todos/{id}");

    let fetched: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(fetched, created);

    let completed = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("{uri}/complete"))
            .to_request(),
    )
    .await;
    assert_eq!(completed.status(), StatusCode::OK);
    let completed: Value = test::read_body_json(completed).await;
    assert_eq!(completed.get("is_completed"), Some(&json!(true)));

    let deleted =
        test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn empty_title_creates_nothing() {
    let store = InMemoryUnitOfWork::default();
    let app = test::init_service(app(store.clone())).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.committed().await.is_empty());
}

#[actix_web::test]
async fn put_without_fields_is_rejected() {
    let app = test::init_service(app(InMemoryUnitOfWork::default())).await;
    let created: TodoResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": "Buy milk" }))
            .to_request(),
    )
    .await;

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{}", created.id))
            .set_json(json!({ "title": null, "description": null }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("Buy milk", None)]
#[case("  padded  ", Some("kept verbatim"))]
#[case("ünïcödé ✓", Some(""))]
#[actix_web::test]
async fn created_todos_read_back_unchanged(
    #[case] title: &str,
    #[case] description: Option<&str>,
) {
    let app = test::init_service(app(InMemoryUnitOfWork::default())).await;

    let created: TodoResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/todos")
            .set_json(json!({ "title": title, "description": description }))
            .to_request(),
    )
    .await;
    let fetched: TodoResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/todos/{}", created.id))
            .to_request(),
    )
    .await;

    assert_eq!(fetched.title, title);
    assert_eq!(fetched.description.as_deref(), description);
    assert!(!fetched.is_completed);
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[actix_web::test]
async fn list_count_tracks_deletes() {
    let app = test::init_service(app(InMemoryUnitOfWork::default())).await;
    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        let created: TodoResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/todos")
                .set_json(json!({ "title": title }))
                .to_request(),
        )
        .await;
        ids.push(created.id);
    }
    let first = ids.first().copied().expect("three todos created");
    test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/todos/{first}"))
            .to_request(),
    )
    .await;

    let listed: TodoListResponse =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/todos").to_request())
            .await;

    assert_eq!(listed.count, 2);
    assert_eq!(listed.items.len(), 2);
    assert!(listed.items.iter().all(|todo| todo.id != first));
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = test::init_service(app(InMemoryUnitOfWork::default())).await;

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
            .await;

    assert_eq!(body, json!({ "status": "ok" }));
}
