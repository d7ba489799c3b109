//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{
    cors::create_cors_layer, create_security_headers_layer, rate_limit_api, rate_limit_auth,
    require_admin, require_auth, track_metrics,
};
use crate::startup::AppState;

/// Room for multipart framing around the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let settings = state.settings.clone();
    let public_path = settings.uploads.public_path.trim_end_matches('/');

    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .nest_service(public_path, ServeDir::new(&settings.uploads.directory))
        .layer(middleware::from_fn(track_metrics))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&settings.cors))
        // Outermost so every response carries the headers
        .layer(create_security_headers_layer(&settings.security))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        metrics::gather_metrics(),
    )
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth has its own stricter limiter
        .nest("/auth", auth_routes(state.clone()))
        .merge(
            Router::new()
                // Admin backend
                .nest("/users", user_routes(state.clone()))
                .nest("/categories", category_routes(state.clone()))
                .nest("/tags", tag_routes(state.clone()))
                .nest("/blog-posts", blog_post_routes(state.clone()))
                // Consumer API
                .nest("/blog", public_blog_routes())
                .nest("/medications", medication_routes(state.clone()))
                .nest("/medication-logs", medication_log_routes(state.clone()))
                .nest("/ai", ai_routes(state.clone()))
                .route_layer(middleware::from_fn_with_state(state, rate_limit_api)),
        )
}

fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(handlers::auth::profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh_token))
        .route("/logout", post(handlers::auth::logout))
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(state, rate_limit_auth))
}

fn user_routes(state: AppState) -> Router<AppState> {
    use handlers::user;

    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route(
            "/{id}",
            get(user::get_user)
                .patch(user::update_user)
                .delete(user::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin))
}

fn category_routes(state: AppState) -> Router<AppState> {
    use handlers::category;

    let admin = Router::new()
        .route("/", post(category::create_category))
        .route(
            "/{id}",
            patch(category::update_category).delete(category::delete_category),
        )
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/", get(category::list_categories))
        .route("/active", get(category::list_active_categories))
        .route("/slug/{slug}", get(category::get_category_by_slug))
        .route("/{id}", get(category::get_category))
        .merge(admin)
}

fn tag_routes(state: AppState) -> Router<AppState> {
    use handlers::tag;

    let admin = Router::new()
        .route("/", post(tag::create_tag))
        .route("/{id}", patch(tag::update_tag).delete(tag::delete_tag))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/", get(tag::list_tags))
        .route("/active", get(tag::list_active_tags))
        .route("/slug/{slug}", get(tag::get_tag_by_slug))
        .route("/{id}", get(tag::get_tag))
        .merge(admin)
}

fn blog_post_routes(state: AppState) -> Router<AppState> {
    use handlers::blog_post;

    let upload_limit = state.settings.uploads.max_bytes + MULTIPART_OVERHEAD_BYTES;

    let admin = Router::new()
        .route("/", post(blog_post::create_post))
        .route("/statistics", get(blog_post::statistics))
        .route(
            "/upload",
            post(blog_post::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/{id}",
            patch(blog_post::update_post).delete(blog_post::delete_post),
        )
        .route("/{id}/publish", patch(blog_post::publish_post))
        .route("/{id}/archive", patch(blog_post::archive_post))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .route("/", get(blog_post::list_posts))
        .route("/slug/{slug}", get(blog_post::get_post_by_slug))
        .route("/{id}", get(blog_post::get_post))
        .route("/{id}/view", put(blog_post::record_view))
        .route("/{id}/like", put(blog_post::record_like))
        .merge(admin)
}

fn public_blog_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::public_blog::list_posts))
        .route("/posts/{slug}", get(handlers::public_blog::get_post))
}

fn medication_routes(state: AppState) -> Router<AppState> {
    use handlers::medication;

    Router::new()
        .route(
            "/",
            get(medication::list_medications).post(medication::create_medication),
        )
        .route(
            "/{id}",
            get(medication::get_medication)
                .put(medication::update_medication)
                .delete(medication::delete_medication),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn medication_log_routes(state: AppState) -> Router<AppState> {
    use handlers::medication_log;

    Router::new()
        .route(
            "/",
            get(medication_log::list_logs).post(medication_log::create_log),
        )
        .route("/export", get(medication_log::export_logs))
        .route("/calendar", get(medication_log::calendar))
        .route(
            "/{id}",
            get(medication_log::get_log)
                .put(medication_log::update_log)
                .delete(medication_log::delete_log),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn ai_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/analyze-note", post(handlers::ai::analyze_note))
        .route("/analyze-and-save", post(handlers::ai::analyze_and_save))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}
