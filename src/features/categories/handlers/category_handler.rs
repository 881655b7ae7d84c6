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
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// Query params for listing categories
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCategoriesQuery {
    /// Parent category to list the children of; absent = root level
    pub parent_id: Option<Uuid>,
}

/// List categories at one level of the tree
#[utoipa::path(
    get,
    path = "/api/categories",
    params(
        ("parentId" = Option<Uuid>, Query, description = "Parent category id; absent lists root categories")
    ),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories = service.list(query.parent_id).await?;
    let total = categories.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(categories),
        None,
        Some(Meta { total }),
    )))
}

/// Get a category by id, with children when it is a folder
#[utoipa::path(
    get,
    path = "/api/categories/id/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category_by_id(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Get a root-level category by slug
#[utoipa::path(
    get,
    path = "/api/categories/slug/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category_by_slug(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = service.get_by_slug(&slug, None).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Get a nested category by its parent's slug and its own slug
#[utoipa::path(
    get,
    path = "/api/categories/parent/{parentSlug}/slug/{slug}",
    params(
        ("parentSlug" = String, Path, description = "Parent category slug"),
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category or parent not found")
    ),
    tag = "categories"
)]
pub async fn get_category_by_nested_slug(
    State(service): State<Arc<CategoryService>>,
    Path((parent_slug, slug)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = service.get_by_slug(&slug, Some(&parent_slug)).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Parent category not found"),
        (status = 409, description = "Duplicate sibling name/slug or non-folder parent")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(category), None, None)),
    ))
}

/// Partially update a category
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category or parent not found"),
        (status = 409, description = "Duplicate sibling name/slug, cycle, or duplicate marker flag")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete a category (refused while it has children or sections)
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category id")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has children")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted successfully".to_string()),
        None,
    )))
}

/// Delete all categories (refused while the collection is nested)
#[utoipa::path(
    delete,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories deleted"),
        (status = 409, description = "Collection still contains subcategories")
    ),
    tag = "categories"
)]
pub async fn delete_all_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = service.delete_all().await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("All categories deleted successfully".to_string()),
        Some(Meta {
            total: deleted as i64,
        }),
    )))
}
