use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategoryRefDto;
use crate::features::sections::models::SectionWithCategory;
use crate::shared::patch::double_option;

/// Request DTO for creating a section
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Explicit slug; derived from the name when absent
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    pub description: Option<String>,

    /// Owning category (required, immutable container)
    pub category: Uuid,

    /// Parent section; must be a folder in the same category. Absent = root
    /// of the category.
    pub parent: Option<Uuid>,

    /// Defaults to true (folder)
    pub is_folder: Option<bool>,

    /// Sort key among siblings; defaults to 0
    pub display_order: Option<i32>,

    pub is_active: Option<bool>,
}

/// Request DTO for partially updating a section.
///
/// Absent fields are left unchanged; `parent` and `description` accept
/// explicit `null` to clear.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    /// Move the section to another category. The effective parent must live
    /// in the target category and the section must have no children.
    pub category: Option<Uuid>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub parent: Option<Option<Uuid>>,

    pub is_folder: Option<bool>,

    pub display_order: Option<i32>,

    pub is_active: Option<bool>,
}

/// Response DTO for section
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponseDto {
    pub id: Uuid,
    pub category: CategoryRefDto,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_folder: bool,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<SectionWithCategory> for SectionResponseDto {
    fn from(s: SectionWithCategory) -> Self {
        Self {
            id: s.id,
            category: CategoryRefDto {
                id: s.category_id,
                name: s.category_name,
                slug: s.category_slug,
            },
            parent_id: s.parent_id,
            name: s.name,
            slug: s.slug,
            description: s.description,
            is_folder: s.is_folder,
            display_order: s.display_order,
            is_active: s.is_active,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Slim section reference embedded in content responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionRefDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
    pub category: CategoryRefDto,
}

/// Response DTO for a single section with its direct children
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetailDto {
    #[serde(flatten)]
    pub section: SectionResponseDto,
    /// Direct children; empty for non-folder sections
    pub children: Vec<SectionResponseDto>,
}

impl SectionDetailDto {
    pub fn new(section: SectionWithCategory, children: Vec<SectionWithCategory>) -> Self {
        Self {
            section: section.into(),
            children: children.into_iter().map(|c| c.into()).collect(),
        }
    }
}

/// Response DTO for listing every section of one category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionsByCategoryDto {
    pub category: CategoryRefDto,
    pub sections: Vec<SectionResponseDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dto_null_parent_clears() {
        let dto: UpdateSectionDto = serde_json::from_str(r#"{"parent": null}"#).unwrap();
        assert_eq!(dto.parent, Some(None));
        assert!(dto.category.is_none());
    }

    #[test]
    fn test_update_dto_absent_fields_unchanged() {
        let dto: UpdateSectionDto = serde_json::from_str(r#"{"displayOrder": 3}"#).unwrap();
        assert_eq!(dto.display_order, Some(3));
        assert!(dto.parent.is_none());
        assert!(dto.name.is_none());
    }

    #[test]
    fn test_detail_dto_flattens_section() {
        let section = SectionWithCategory {
            id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            parent_id: None,
            name: "AI".to_string(),
            slug: "ai".to_string(),
            description: None,
            is_folder: false,
            display_order: 0,
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            category_name: "Tech".to_string(),
            category_slug: "tech".to_string(),
        };

        let detail = SectionDetailDto::new(section, Vec::new());
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["name"], "AI");
        assert_eq!(json["category"]["slug"], "tech");
        assert!(json["children"].as_array().unwrap().is_empty());
    }
}
