/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use taskmanager_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config, error::json_method_not_allowed, middleware::auth::jwt_auth_layer, routes,
};
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use taskmanager_shared::{auth::jwt::TokenService, repository::Repositories, services::Services};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through axum's `State` extractor; every field
/// is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,

    pub services: Services,

    pub config: Arc<Config>,
}

impl AppState {
    /// Wires PostgreSQL repositories and services for the given pool
    pub fn new(db: PgPool, config: Config) -> Self {
        let services = Services::new(
            Repositories::postgres(db.clone()),
            TokenService::new(&config.jwt.secret),
        );

        Self::with_services(db, services, config)
    }

    /// Uses prebuilt services, e.g. with a shortened token lifetime
    pub fn with_services(db: PgPool, services: Services, config: Config) -> Self {
        Self {
            db,
            services,
            config: Arc::new(config),
        }
    }
}

/// Builds the router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET    /ping               public
/// GET    /health             public
/// POST   /register           public
/// POST   /login              public
/// GET    /tasks              bearer token
/// POST   /tasks              bearer token
/// GET    /tasks/:task_id     bearer token
/// PATCH  /tasks/:task_id     bearer token
/// DELETE /tasks/:task_id     bearer token
/// ```
///
/// # Middleware Stack
///
/// Outermost first: request id, tracing, request id propagation, panic
/// catching, CORS, timeout, body limit, JSON 405 bodies.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/ping", get(routes::health::ping))
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let task_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::index).post(routes::tasks::store),
        )
        .route(
            "/tasks/:task_id",
            get(routes::tasks::show)
                .patch(routes::tasks::update)
                .delete(routes::tasks::destroy),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api = &state.config.api;
    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id,
                user_id = tracing::field::Empty,
            )
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .merge(public_routes)
        .merge(task_routes)
        .layer(axum::middleware::map_response(json_method_not_allowed))
        .layer(DefaultBodyLimit::max(api.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            api.request_timeout_seconds,
        )))
        .layer(cors_layer(&api.cors_origins))
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
