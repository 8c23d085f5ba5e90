//! Editor API: website CRUD, page editing and preview for account owners.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub use auth::AccountRegistry;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/websites", get(list_websites).post(create_website))
        .route(
            "/admin/websites/{slug}",
            get(show_website).put(update_website).delete(delete_website),
        )
        .route("/admin/websites/{slug}/normalize", post(normalize_pages))
        .route("/admin/websites/{slug}/pages", get(list_pages))
        .route(
            "/admin/websites/{slug}/pages/{*page}",
            get(show_page).patch(update_page),
        )
        .route("/admin/websites/{slug}/preview", get(preview_home))
        .route("/admin/websites/{slug}/preview/{*page}", get(preview_page))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
