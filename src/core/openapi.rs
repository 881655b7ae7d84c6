use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::content::{
    dtos as content_dtos, handlers as content_handlers, models as content_models,
};
use crate::features::sections::{dtos as sections_dtos, handlers as sections_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category_by_id,
        categories_handlers::get_category_by_slug,
        categories_handlers::get_category_by_nested_slug,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        categories_handlers::delete_all_categories,
        // Sections
        sections_handlers::list_sections,
        sections_handlers::get_section_by_id,
        sections_handlers::list_sections_by_category,
        sections_handlers::get_section_by_slug,
        sections_handlers::get_section_by_nested_slug,
        sections_handlers::create_section,
        sections_handlers::update_section,
        sections_handlers::delete_section,
        sections_handlers::delete_all_sections,
        // Content
        content_handlers::list_content,
        content_handlers::get_content_by_id,
        content_handlers::get_content_by_section,
        content_handlers::get_content_by_category,
        content_handlers::get_content_by_slug,
        content_handlers::create_content,
        content_handlers::update_content,
        content_handlers::delete_content,
        content_handlers::delete_all_content,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryDetailDto,
            categories_dtos::CategoryRefDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryDetailDto>,
            // Sections
            sections_dtos::CreateSectionDto,
            sections_dtos::UpdateSectionDto,
            sections_dtos::SectionResponseDto,
            sections_dtos::SectionDetailDto,
            sections_dtos::SectionRefDto,
            sections_dtos::SectionsByCategoryDto,
            ApiResponse<sections_dtos::SectionResponseDto>,
            ApiResponse<Vec<sections_dtos::SectionResponseDto>>,
            ApiResponse<sections_dtos::SectionDetailDto>,
            ApiResponse<sections_dtos::SectionsByCategoryDto>,
            // Content
            content_models::ContentImage,
            content_models::ContentField,
            content_models::ContentFieldValue,
            content_dtos::CreateContentDto,
            content_dtos::UpdateContentDto,
            content_dtos::ContentResponseDto,
            content_dtos::EmptyContentDto,
            ApiResponse<content_dtos::ContentResponseDto>,
            ApiResponse<Vec<content_dtos::ContentResponseDto>>,
        )
    ),
    tags(
        (name = "categories", description = "Category tree management"),
        (name = "sections", description = "Section tree management within categories"),
        (name = "content", description = "Content records attached to leaf sections"),
    ),
    info(
        title = "Canopy API",
        version = "0.1.0",
        description = "API documentation for Canopy",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
