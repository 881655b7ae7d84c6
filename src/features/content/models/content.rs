use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One entry of a content record's image gallery, stored in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(default)]
    pub order: i32,
}

/// A typed key/value entry of a content record.
///
/// The `type` discriminant selects the payload shape; unknown discriminants
/// are rejected at deserialization, before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentFieldValue {
    /// Free-form text block
    Text {
        key: String,
        content: String,
        #[serde(default)]
        order: i32,
    },
    /// Reference to a hosted image
    Image {
        key: String,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default)]
        order: i32,
    },
    /// Marks the entry carrying the lead/teaser role
    Lead {
        key: String,
        lead: bool,
        #[serde(default)]
        order: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentField {
    pub value: ContentFieldValue,
}

/// Database model for content
#[derive(Debug, Clone, FromRow)]
pub struct Content {
    pub id: Uuid,
    pub section_id: Uuid,
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub images: Json<Vec<ContentImage>>,
    pub fields: Json<Vec<ContentField>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content row joined with its section and the section's owning category
#[derive(Debug, Clone, FromRow)]
pub struct ContentWithRefs {
    pub id: Uuid,
    pub section_id: Uuid,
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub images: Json<Vec<ContentImage>>,
    pub fields: Json<Vec<ContentField>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub section_name: String,
    pub section_slug: String,
    pub section_parent_id: Option<Uuid>,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_text_round_trip() {
        let json = r#"{"type": "text", "key": "body", "content": "Hello", "order": 2}"#;
        let value: ContentFieldValue = serde_json::from_str(json).unwrap();
        assert_eq!(
            value,
            ContentFieldValue::Text {
                key: "body".to_string(),
                content: "Hello".to_string(),
                order: 2,
            }
        );

        let back = serde_json::to_value(&value).unwrap();
        assert_eq!(back["type"], "text");
        assert_eq!(back["order"], 2);
    }

    #[test]
    fn test_field_value_image_defaults_order() {
        let json = r#"{"type": "image", "key": "hero", "url": "https://cdn.example/img.png"}"#;
        let value: ContentFieldValue = serde_json::from_str(json).unwrap();
        match value {
            ContentFieldValue::Image { order, title, .. } => {
                assert_eq!(order, 0);
                assert!(title.is_none());
            }
            other => panic!("expected image variant, got {:?}", other),
        }
    }

    #[test]
    fn test_field_value_lead_flag() {
        let json = r#"{"type": "lead", "key": "intro", "lead": true}"#;
        let value: ContentFieldValue = serde_json::from_str(json).unwrap();
        assert_eq!(
            value,
            ContentFieldValue::Lead {
                key: "intro".to_string(),
                lead: true,
                order: 0,
            }
        );
    }

    #[test]
    fn test_field_value_rejects_unknown_type() {
        let json = r#"{"type": "video", "key": "clip", "url": "https://cdn.example/v.mp4"}"#;
        assert!(serde_json::from_str::<ContentFieldValue>(json).is_err());
    }

    #[test]
    fn test_image_entry_optional_metadata() {
        let json = r#"{"url": "https://cdn.example/a.png", "width": 800, "height": 600}"#;
        let image: ContentImage = serde_json::from_str(json).unwrap();
        assert_eq!(image.width, Some(800));
        assert_eq!(image.order, 0);
        assert!(image.alt.is_none());

        let back = serde_json::to_value(&image).unwrap();
        assert!(back.get("alt").is_none());
    }
}
