pub mod error;
pub mod extractors;
pub mod guard;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public invitation redemption
    let invite_routes = Router::new().route("/validate", post(routes::invite::validate));

    // Session introspection / sign-out
    let session_routes = Router::new()
        .route("/me", get(routes::session::me))
        .route("/logout", post(routes::session::logout));

    // Code administration (engineer sessions only)
    let admin_invite_routes = Router::new()
        .route("/", get(routes::admin::list_invites))
        .route("/", post(routes::admin::create_invite))
        .route("/{code}", delete(routes::admin::delete_invite));

    // Compose API
    let api = Router::new()
        .nest("/invite", invite_routes)
        .nest("/session", session_routes)
        .nest("/admin/invite", admin_invite_routes);

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
