use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::sections::dtos::{
    CreateSectionDto, SectionDetailDto, SectionResponseDto, SectionsByCategoryDto,
    UpdateSectionDto,
};
use crate::features::sections::services::SectionService;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing sections
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSectionsQuery {
    /// Restrict to one category
    pub category_id: Option<Uuid>,
    /// Parent section to list the children of; absent = category roots
    pub parent_id: Option<Uuid>,
}

/// List sections at one level of their category
#[utoipa::path(
    get,
    path = "/api/sections",
    params(
        ("categoryId" = Option<Uuid>, Query, description = "Restrict to one category"),
        ("parentId" = Option<Uuid>, Query, description = "Parent section id; absent lists root sections")
    ),
    responses(
        (status = 200, description = "List of sections", body = ApiResponse<Vec<SectionResponseDto>>),
    ),
    tag = "sections"
)]
pub async fn list_sections(
    State(service): State<Arc<SectionService>>,
    Query(query): Query<ListSectionsQuery>,
) -> Result<Json<ApiResponse<Vec<SectionResponseDto>>>> {
    let sections = service.list(query.category_id, query.parent_id).await?;
    let total = sections.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(sections),
        None,
        Some(Meta { total }),
    )))
}

/// Get a section by id, with children when it is a folder
#[utoipa::path(
    get,
    path = "/api/sections/id/{id}",
    params(
        ("id" = Uuid, Path, description = "Section id")
    ),
    responses(
        (status = 200, description = "Section found", body = ApiResponse<SectionDetailDto>),
        (status = 404, description = "Section not found")
    ),
    tag = "sections"
)]
pub async fn get_section_by_id(
    State(service): State<Arc<SectionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SectionDetailDto>>> {
    let section = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(section), None, None)))
}

/// Every section of one category, flat, with a category summary
#[utoipa::path(
    get,
    path = "/api/sections/category/{categoryId}",
    params(
        ("categoryId" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Sections of the category", body = ApiResponse<SectionsByCategoryDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "sections"
)]
pub async fn list_sections_by_category(
    State(service): State<Arc<SectionService>>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<ApiResponse<SectionsByCategoryDto>>> {
    let sections = service.list_by_category(category_id).await?;
    Ok(Json(ApiResponse::success(Some(sections), None, None)))
}

/// Resolve a root-level section by category slug and section slug
#[utoipa::path(
    get,
    path = "/api/sections/category/{categorySlug}/section/{sectionSlug}",
    params(
        ("categorySlug" = String, Path, description = "Category slug"),
        ("sectionSlug" = String, Path, description = "Section slug")
    ),
    responses(
        (status = 200, description = "Section found", body = ApiResponse<SectionDetailDto>),
        (status = 404, description = "Category or section not found")
    ),
    tag = "sections"
)]
pub async fn get_section_by_slug(
    State(service): State<Arc<SectionService>>,
    Path((category_slug, section_slug)): Path<(String, String)>,
) -> Result<Json<ApiResponse<SectionDetailDto>>> {
    let section = service
        .get_by_slug(&category_slug, None, &section_slug)
        .await?;
    Ok(Json(ApiResponse::success(Some(section), None, None)))
}

/// Resolve a nested section by category slug, parent section slug, and its
/// own slug
#[utoipa::path(
    get,
    path = "/api/sections/category/{categorySlug}/parent/{parentSlug}/section/{sectionSlug}",
    params(
        ("categorySlug" = String, Path, description = "Category slug"),
        ("parentSlug" = String, Path, description = "Parent section slug"),
        ("sectionSlug" = String, Path, description = "Section slug")
    ),
    responses(
        (status = 200, description = "Section found", body = ApiResponse<SectionDetailDto>),
        (status = 404, description = "Category, parent, or section not found")
    ),
    tag = "sections"
)]
pub async fn get_section_by_nested_slug(
    State(service): State<Arc<SectionService>>,
    Path((category_slug, parent_slug, section_slug)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<SectionDetailDto>>> {
    let section = service
        .get_by_slug(&category_slug, Some(&parent_slug), &section_slug)
        .await?;
    Ok(Json(ApiResponse::success(Some(section), None, None)))
}

/// Create a section
#[utoipa::path(
    post,
    path = "/api/sections",
    request_body = CreateSectionDto,
    responses(
        (status = 201, description = "Section created", body = ApiResponse<SectionResponseDto>),
        (status = 404, description = "Category or parent section not found"),
        (status = 409, description = "Duplicate sibling name/slug, non-folder parent, or cross-category parent")
    ),
    tag = "sections"
)]
pub async fn create_section(
    State(service): State<Arc<SectionService>>,
    AppJson(dto): AppJson<CreateSectionDto>,
) -> Result<(StatusCode, Json<ApiResponse<SectionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let section = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(section), None, None)),
    ))
}

/// Partially update a section
#[utoipa::path(
    put,
    path = "/api/sections/{id}",
    params(
        ("id" = Uuid, Path, description = "Section id")
    ),
    request_body = UpdateSectionDto,
    responses(
        (status = 200, description = "Section updated", body = ApiResponse<SectionResponseDto>),
        (status = 404, description = "Section, category, or parent not found"),
        (status = 409, description = "Duplicate sibling name/slug, cycle, or containment violation")
    ),
    tag = "sections"
)]
pub async fn update_section(
    State(service): State<Arc<SectionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateSectionDto>,
) -> Result<Json<ApiResponse<SectionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let section = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(section), None, None)))
}

/// Delete a section (refused while it has children or content)
#[utoipa::path(
    delete,
    path = "/api/sections/{id}",
    params(
        ("id" = Uuid, Path, description = "Section id")
    ),
    responses(
        (status = 200, description = "Section deleted"),
        (status = 404, description = "Section not found"),
        (status = 409, description = "Section still has children or content")
    ),
    tag = "sections"
)]
pub async fn delete_section(
    State(service): State<Arc<SectionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Section deleted successfully".to_string()),
        None,
    )))
}

/// Delete all sections (refused while the collection is nested)
#[utoipa::path(
    delete,
    path = "/api/sections",
    responses(
        (status = 200, description = "All sections deleted"),
        (status = 409, description = "Collection still contains subsections or content")
    ),
    tag = "sections"
)]
pub async fn delete_all_sections(
    State(service): State<Arc<SectionService>>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = service.delete_all().await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("All sections deleted successfully".to_string()),
        Some(Meta {
            total: deleted as i64,
        }),
    )))
}
