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
use crate::features::content::dtos::{
    ContentResponseDto, CreateContentDto, EmptyContentDto, UpdateContentDto,
};
use crate::features::content::services::ContentService;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing content
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContentQuery {
    /// Restrict to one section
    pub section_id: Option<Uuid>,
}

/// List content records
#[utoipa::path(
    get,
    path = "/api/content",
    params(
        ("sectionId" = Option<Uuid>, Query, description = "Restrict to one section")
    ),
    responses(
        (status = 200, description = "List of content", body = ApiResponse<Vec<ContentResponseDto>>),
    ),
    tag = "content"
)]
pub async fn list_content(
    State(service): State<Arc<ContentService>>,
    Query(query): Query<ListContentQuery>,
) -> Result<Json<ApiResponse<Vec<ContentResponseDto>>>> {
    let content = service.list(query.section_id).await?;
    let total = content.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(content),
        None,
        Some(Meta { total }),
    )))
}

/// Get a content record by id
#[utoipa::path(
    get,
    path = "/api/content/id/{id}",
    params(
        ("id" = Uuid, Path, description = "Content id")
    ),
    responses(
        (status = 200, description = "Content found", body = ApiResponse<ContentResponseDto>),
        (status = 404, description = "Content not found")
    ),
    tag = "content"
)]
pub async fn get_content_by_id(
    State(service): State<Arc<ContentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContentResponseDto>>> {
    let content = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(content), None, None)))
}

/// Get the content of a leaf section. A section without content yields an
/// empty skeleton with 200, so editors can start from a blank record.
#[utoipa::path(
    get,
    path = "/api/content/section/{sectionId}",
    params(
        ("sectionId" = Uuid, Path, description = "Section id")
    ),
    responses(
        (status = 200, description = "Content, or an empty skeleton when none exists", body = ApiResponse<ContentResponseDto>),
        (status = 404, description = "Section not found"),
        (status = 409, description = "Section is a folder")
    ),
    tag = "content"
)]
pub async fn get_content_by_section(
    State(service): State<Arc<ContentService>>,
    Path(section_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let value = match service.get_by_section(section_id).await? {
        Some(content) => serde_json::to_value(content).unwrap(),
        None => serde_json::to_value(EmptyContentDto::for_section(section_id)).unwrap(),
    };
    Ok(Json(ApiResponse::success(Some(value), None, None)))
}

/// Every content record under one category
#[utoipa::path(
    get,
    path = "/api/content/category/{categoryId}",
    params(
        ("categoryId" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Content of the category", body = ApiResponse<Vec<ContentResponseDto>>),
        (status = 404, description = "Category not found")
    ),
    tag = "content"
)]
pub async fn get_content_by_category(
    State(service): State<Arc<ContentService>>,
    Path(category_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ContentResponseDto>>>> {
    let content = service.get_by_category(category_id).await?;
    Ok(Json(ApiResponse::success(Some(content), None, None)))
}

/// Resolve content by category and slug
#[utoipa::path(
    get,
    path = "/api/content/category/{categoryId}/slug/{slug}",
    params(
        ("categoryId" = Uuid, Path, description = "Category id"),
        ("slug" = String, Path, description = "Content slug")
    ),
    responses(
        (status = 200, description = "Content found", body = ApiResponse<ContentResponseDto>),
        (status = 404, description = "Category or content not found")
    ),
    tag = "content"
)]
pub async fn get_content_by_slug(
    State(service): State<Arc<ContentService>>,
    Path((category_id, slug)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<ContentResponseDto>>> {
    let content = service.get_by_category_and_slug(category_id, &slug).await?;
    Ok(Json(ApiResponse::success(Some(content), None, None)))
}

/// Create content on a leaf section
#[utoipa::path(
    post,
    path = "/api/content",
    request_body = CreateContentDto,
    responses(
        (status = 201, description = "Content created", body = ApiResponse<ContentResponseDto>),
        (status = 400, description = "Missing slug"),
        (status = 404, description = "Section not found"),
        (status = 409, description = "Folder section, occupied section, or duplicate slug in category")
    ),
    tag = "content"
)]
pub async fn create_content(
    State(service): State<Arc<ContentService>>,
    AppJson(dto): AppJson<CreateContentDto>,
) -> Result<(StatusCode, Json<ApiResponse<ContentResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let content = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(content), None, None)),
    ))
}

/// Partially update a content record
#[utoipa::path(
    put,
    path = "/api/content/{id}",
    params(
        ("id" = Uuid, Path, description = "Content id")
    ),
    request_body = UpdateContentDto,
    responses(
        (status = 200, description = "Content updated", body = ApiResponse<ContentResponseDto>),
        (status = 404, description = "Content not found"),
        (status = 409, description = "Duplicate slug in category")
    ),
    tag = "content"
)]
pub async fn update_content(
    State(service): State<Arc<ContentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateContentDto>,
) -> Result<Json<ApiResponse<ContentResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let content = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(content), None, None)))
}

/// Delete a content record
#[utoipa::path(
    delete,
    path = "/api/content/{id}",
    params(
        ("id" = Uuid, Path, description = "Content id")
    ),
    responses(
        (status = 200, description = "Content deleted"),
        (status = 404, description = "Content not found")
    ),
    tag = "content"
)]
pub async fn delete_content(
    State(service): State<Arc<ContentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Content deleted successfully".to_string()),
        None,
    )))
}

/// Delete all content records
#[utoipa::path(
    delete,
    path = "/api/content",
    responses(
        (status = 200, description = "All content deleted"),
    ),
    tag = "content"
)]
pub async fn delete_all_content(
    State(service): State<Arc<ContentService>>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = service.delete_all().await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("All content deleted successfully".to_string()),
        Some(Meta {
            total: deleted as i64,
        }),
    )))
}
