use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::sections::handlers;
use crate::features::sections::services::SectionService;

/// Create routes for the sections feature
pub fn routes(service: Arc<SectionService>) -> Router {
    Router::new()
        .route(
            "/api/sections",
            get(handlers::list_sections)
                .post(handlers::create_section)
                .delete(handlers::delete_all_sections),
        )
        .route("/api/sections/id/{id}", get(handlers::get_section_by_id))
        .route(
            "/api/sections/category/{categoryId}",
            get(handlers::list_sections_by_category),
        )
        .route(
            "/api/sections/category/{categorySlug}/section/{sectionSlug}",
            get(handlers::get_section_by_slug),
        )
        .route(
            "/api/sections/category/{categorySlug}/parent/{parentSlug}/section/{sectionSlug}",
            get(handlers::get_section_by_nested_slug),
        )
        .route(
            "/api/sections/{id}",
            put(handlers::update_section).delete(handlers::delete_section),
        )
        .with_state(service)
}
