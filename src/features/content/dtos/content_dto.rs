use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategoryRefDto;
use crate::features::content::models::{ContentField, ContentImage, ContentWithRefs};
use crate::features::sections::dtos::SectionRefDto;

/// Request DTO for creating content on a leaf section
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentDto {
    /// Target section; must be non-folder and not yet hold content
    pub section: Uuid,

    /// Required; unique across the category owning the section
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    pub title: Option<String>,

    pub subtitle: Option<String>,

    pub images: Option<Vec<ContentImage>>,

    pub fields: Option<Vec<ContentField>>,
}

/// Request DTO for partially updating content. The section reference is
/// fixed at creation; move content by deleting and recreating it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentDto {
    #[validate(length(min = 1, max = 255, message = "Slug must be 1-255 characters"))]
    pub slug: Option<String>,

    pub title: Option<String>,

    pub subtitle: Option<String>,

    pub images: Option<Vec<ContentImage>>,

    pub fields: Option<Vec<ContentField>>,

    pub is_active: Option<bool>,
}

/// Response DTO for content
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponseDto {
    pub id: Uuid,
    pub section: SectionRefDto,
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub images: Vec<ContentImage>,
    pub fields: Vec<ContentField>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ContentWithRefs> for ContentResponseDto {
    fn from(c: ContentWithRefs) -> Self {
        Self {
            id: c.id,
            section: SectionRefDto {
                id: c.section_id,
                name: c.section_name,
                slug: c.section_slug,
                parent_id: c.section_parent_id,
                category: CategoryRefDto {
                    id: c.category_id,
                    name: c.category_name,
                    slug: c.category_slug,
                },
            },
            slug: c.slug,
            title: c.title,
            subtitle: c.subtitle,
            images: c.images.0,
            fields: c.fields.0,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Skeleton returned by get-by-section when the section has no content yet.
/// Mirrors the editable shape so clients can render an empty editor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmptyContentDto {
    pub section: Uuid,
    pub title: String,
    pub subtitle: String,
    pub images: Vec<ContentImage>,
    pub fields: Vec<ContentField>,
}

impl EmptyContentDto {
    pub fn for_section(section_id: Uuid) -> Self {
        Self {
            section: section_id,
            title: String::new(),
            subtitle: String::new(),
            images: Vec::new(),
            fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_skeleton_shape() {
        let section_id = Uuid::new_v4();
        let skeleton = EmptyContentDto::for_section(section_id);
        let json = serde_json::to_value(&skeleton).unwrap();

        assert_eq!(json["section"], section_id.to_string());
        assert_eq!(json["title"], "");
        assert!(json["images"].as_array().unwrap().is_empty());
        assert!(json["fields"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_create_dto_accepts_typed_fields() {
        let json = r#"{
            "section": "0193d21c-6f2e-7e30-b7b5-111111111111",
            "slug": "intro",
            "fields": [
                {"value": {"type": "text", "key": "body", "content": "Hello"}},
                {"value": {"type": "lead", "key": "intro", "lead": true}}
            ]
        }"#;
        let dto: CreateContentDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.slug.as_deref(), Some("intro"));
        assert_eq!(dto.fields.as_ref().map(|f| f.len()), Some(2));
    }

    #[test]
    fn test_create_dto_rejects_malformed_field() {
        let json = r#"{
            "section": "0193d21c-6f2e-7e30-b7b5-111111111111",
            "slug": "intro",
            "fields": [{"value": {"type": "text", "key": "body"}}]
        }"#;
        assert!(serde_json::from_str::<CreateContentDto>(json).is_err());
    }
}
