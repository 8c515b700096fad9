use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin, RateLimiterState,
};
use crate::routes::{admin, auth, health, registrations, uploads};
use crate::services::AttachmentStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
    pub attachments: Arc<AttachmentStore>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Rate limiting only when enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let attachments = Arc::new(AttachmentStore::new(
        &config.storage,
        &config.server.public_base_url,
    ));

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
        attachments,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public intake routes: unauthenticated writes, rate limited per client.
    // The body limit leaves headroom above the attachment cap so the store's
    // own size check produces the 413, not the framework.
    let intake_routes = Router::new()
        .route(
            "/api/v1/registrations",
            post(registrations::create_registration),
        )
        .route("/api/v1/uploads", post(uploads::generate_upload_url))
        .route("/api/v1/uploads/:storage_id", put(uploads::upload_attachment))
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes + 4096))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Public read routes (no authentication required)
    let public_routes = Router::new()
        .route(
            "/api/v1/registrations/pass/:pass_id",
            get(registrations::get_by_pass_id),
        )
        .route(
            "/api/v1/registration-status",
            get(registrations::get_registration_status),
        )
        .route("/api/v1/attachments/:id", get(uploads::get_attachment))
        .route("/api/v1/admin/login", post(auth::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Admin routes (require a live admin session)
    let admin_routes = Router::new()
        .route("/api/v1/admin/registrations", get(admin::list_registrations))
        .route(
            "/api/v1/admin/registrations/stats",
            get(admin::get_stats),
        )
        .route(
            "/api/v1/admin/registrations/export",
            get(admin::export_verified_csv),
        )
        .route(
            "/api/v1/admin/registrations/close",
            post(admin::close_registrations),
        )
        .route(
            "/api/v1/admin/registrations/open",
            post(admin::open_registrations),
        )
        .route(
            "/api/v1/admin/registrations/:id/status",
            patch(admin::update_status),
        )
        .route(
            "/api/v1/admin/registrations/:id",
            delete(admin::delete_registration),
        )
        .route("/api/v1/admin/logout", post(auth::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(intake_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
