use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as AnyHeader, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::IdentityVerifier;
use crate::config::{AppConfig, Environment, SecurityConfig};
use crate::database::Store;
use crate::handlers::{protected, public};
use crate::middleware::require_identity;

/// Shared per-process dependencies. Holds no per-user state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { store, verifier }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let api = Router::new()
        .merge(auth_routes())
        .merge(client_routes())
        .merge(review_request_routes())
        .merge(testimonial_routes())
        .merge(dashboard_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_identity));

    let mut app = Router::new()
        // Public
        .route("/health", get(public::health))
        // Protected
        .nest("/api", api)
        .fallback(public::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(CatchPanicLayer::custom(handle_panic));

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security, config.environment));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/user", get(protected::auth::user))
}

fn client_routes() -> Router<AppState> {
    use protected::clients;

    Router::new()
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/:id",
            get(clients::get).put(clients::update).delete(clients::delete),
        )
}

fn review_request_routes() -> Router<AppState> {
    use protected::review_requests;

    Router::new()
        .route(
            "/review-requests",
            get(review_requests::list).post(review_requests::create),
        )
        .route("/review-requests/:id", get(review_requests::get))
        .route("/review-requests/:id/status", put(review_requests::update_status))
}

fn testimonial_routes() -> Router<AppState> {
    use protected::testimonials;

    Router::new()
        .route("/testimonials", get(testimonials::list).post(testimonials::create))
        .route("/testimonials/:id", get(testimonials::get))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/stats", get(protected::dashboard::stats))
}

fn cors_layer(security: &SecurityConfig, environment: Environment) -> CorsLayer {
    if environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AnyHeader)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Internal server error" })),
    )
        .into_response()
}
