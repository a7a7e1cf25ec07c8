pub mod error;
pub mod init;
pub mod messages;
pub mod middleware;
pub mod password;
pub mod token;
pub mod users;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use corkboard_db::Database;

use crate::middleware::{require_auth, require_initialized};
use crate::token::AuthConfig;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub auth: AuthConfig,
    /// One-way initialization latch: flips to true once an ADMIN user exists
    /// and never resets for the life of the process.
    pub initialized: AtomicBool,
}

impl AppStateInner {
    pub fn new(db: Database, auth: AuthConfig) -> AppState {
        Arc::new(Self {
            db,
            auth,
            initialized: AtomicBool::new(false),
        })
    }
}

/// Assemble the full route table. Everything except `/init` sits behind the
/// initialization gate; mutating routes additionally require a bearer token.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/sign_up", post(users::sign_up))
        .route("/sign_in", post(users::sign_in))
        .route("/users", get(users::list_users))
        .route("/users/{user_id}", get(users::get_user))
        .route("/messages", get(messages::list_messages))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users/me", get(users::me))
        .route("/messages", post(messages::create_message))
        .route("/messages/{message_id}", delete(messages::delete_message))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state.clone());

    let gated = public_routes
        .merge(protected_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_initialized));

    Router::new()
        .route("/init", post(init::create_first_admin))
        .with_state(state)
        .merge(gated)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
