//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;

pub use config::{ServerConfig, StorageBackend};
#[cfg(feature = "metrics")]
pub(crate) use metrics::build_metrics;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::{info, warn};

use todo_backend::Trace;
#[cfg(debug_assertions)]
use todo_backend::doc::ApiDoc;
use todo_backend::domain::TodoService;
use todo_backend::domain::ports::TodoUnitOfWork;
use todo_backend::inbound::http::health::{HealthState, health, live, ready};
use todo_backend::inbound::http::json_config;
use todo_backend::inbound::http::state::HttpState;
use todo_backend::inbound::http::todos;
use todo_backend::outbound::persistence::DieselUnitOfWork;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn state_for<U: TodoUnitOfWork + 'static>(unit_of_work: U) -> HttpState {
    let service = Arc::new(TodoService::new(
        Arc::new(unit_of_work),
        Arc::new(DefaultClock),
    ));
    HttpState::new(service.clone(), service)
}

/// Wire the Todo use cases to the configured storage.
fn build_http_state(storage: &StorageBackend) -> HttpState {
    match storage {
        StorageBackend::Postgres(pool) => state_for(DieselUnitOfWork::new(pool.clone())),
        StorageBackend::InMemory(store) => state_for(store.clone()),
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    api_prefix: String,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        api_prefix,
    } = deps;

    // Health checks are registered before the API scope, which may be mounted at
    // the root and would otherwise shadow them.
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(health)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.service(web::scope(&api_prefix).configure(todos::configure))
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Readiness is flipped once the listener is bound. Signal handling is taken
/// over from actix so liveness fails before connections start draining.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config.storage));
    let ServerConfig {
        bind_addr,
        api_prefix,
        storage: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            api_prefix: api_prefix.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "todo server listening");
    health_state.mark_ready();
    actix_web::rt::spawn(drain_on_signal(server.handle(), health_state));
    Ok(server)
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

async fn drain_on_signal(handle: ServerHandle, health_state: web::Data<HealthState>) {
    if let Err(err) = shutdown_signal().await {
        warn!(error = %err, "failed to listen for shutdown signals");
        return;
    }
    begin_shutdown(&handle, &health_state).await;
}

/// Fail liveness checks, then stop the server once in-flight requests finish.
async fn begin_shutdown(handle: &ServerHandle, health_state: &HealthState) {
    health_state.mark_unhealthy();
    info!("shutdown requested; draining connections");
    handle.stop(true).await;
}
