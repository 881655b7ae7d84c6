use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::content::handlers;
use crate::features::content::services::ContentService;

/// Create routes for the content feature
pub fn routes(service: Arc<ContentService>) -> Router {
    Router::new()
        .route(
            "/api/content",
            get(handlers::list_content)
                .post(handlers::create_content)
                .delete(handlers::delete_all_content),
        )
        .route("/api/content/id/{id}", get(handlers::get_content_by_id))
        .route(
            "/api/content/section/{sectionId}",
            get(handlers::get_content_by_section),
        )
        .route(
            "/api/content/category/{categoryId}",
            get(handlers::get_content_by_category),
        )
        .route(
            "/api/content/category/{categoryId}/slug/{slug}",
            get(handlers::get_content_by_slug),
        )
        .route(
            "/api/content/{id}",
            put(handlers::update_content).delete(handlers::delete_content),
        )
        .with_state(service)
}
