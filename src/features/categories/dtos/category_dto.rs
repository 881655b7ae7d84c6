use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::patch::double_option;

/// Request DTO for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Explicit slug; derived from the name when absent
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    pub description: Option<String>,

    pub image: Option<String>,

    pub meta_tags: Option<String>,

    /// Parent category; must be an existing folder. Absent = root level.
    pub parent: Option<Uuid>,

    /// Defaults to true (folder)
    pub is_folder: Option<bool>,
}

/// Request DTO for partially updating a category.
///
/// Absent fields are left unchanged. Nullable fields (`parent`,
/// `description`, `image`, `metaTags`) accept explicit `null` to clear.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub meta_tags: Option<Option<String>>,

    pub recent: Option<bool>,

    pub latest: Option<bool>,

    pub most_used: Option<bool>,

    pub trending: Option<bool>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub parent: Option<Option<Uuid>>,

    pub is_folder: Option<bool>,

    pub is_active: Option<bool>,
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_tags: Option<String>,
    pub recent: bool,
    pub latest: bool,
    pub most_used: bool,
    pub trending: bool,
    pub is_folder: bool,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            image: c.image,
            meta_tags: c.meta_tags,
            recent: c.recent,
            latest: c.latest,
            most_used: c.most_used,
            trending: c.trending,
            is_folder: c.is_folder,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Slim category reference embedded in section/content responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRefDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Response DTO for a single category with its direct children
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetailDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    /// Direct children; empty for non-folder categories
    pub children: Vec<CategoryResponseDto>,
}

impl CategoryDetailDto {
    pub fn new(category: Category, children: Vec<Category>) -> Self {
        Self {
            category: category.into(),
            children: children.into_iter().map(|c| c.into()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dto_absent_parent_is_unchanged() {
        let dto: UpdateCategoryDto = serde_json::from_str(r#"{"name": "Tech"}"#).unwrap();
        assert_eq!(dto.name.as_deref(), Some("Tech"));
        assert!(dto.parent.is_none());
        assert!(dto.description.is_none());
    }

    #[test]
    fn test_update_dto_null_parent_clears() {
        let dto: UpdateCategoryDto =
            serde_json::from_str(r#"{"parent": null, "description": null}"#).unwrap();
        assert_eq!(dto.parent, Some(None));
        assert_eq!(dto.description, Some(None));
    }

    #[test]
    fn test_update_dto_camel_case_flags() {
        let dto: UpdateCategoryDto =
            serde_json::from_str(r#"{"mostUsed": true, "isActive": false}"#).unwrap();
        assert_eq!(dto.most_used, Some(true));
        assert_eq!(dto.is_active, Some(false));
    }

    fn category_named(name: &str, slug: &str, parent_id: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            parent_id,
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
            image: None,
            meta_tags: None,
            recent: false,
            latest: false,
            most_used: false,
            trending: false,
            is_folder: true,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_detail_dto_flattens_category_with_children() {
        let root = category_named("Tech", "tech", None);
        let child = category_named("Gadgets", "gadgets", Some(root.id));

        let detail = CategoryDetailDto::new(root, vec![child]);
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["slug"], "tech");
        assert_eq!(json["children"][0]["slug"], "gadgets");
        assert_eq!(json["children"].as_array().unwrap().len(), 1);
    }
}
