use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories)
                .post(handlers::create_category)
                .delete(handlers::delete_all_categories),
        )
        .route("/api/categories/id/{id}", get(handlers::get_category_by_id))
        .route(
            "/api/categories/slug/{slug}",
            get(handlers::get_category_by_slug),
        )
        .route(
            "/api/categories/parent/{parentSlug}/slug/{slug}",
            get(handlers::get_category_by_nested_slug),
        )
        .route(
            "/api/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .with_state(service)
}
