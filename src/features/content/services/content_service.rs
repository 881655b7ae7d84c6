use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::content::dtos::{ContentResponseDto, CreateContentDto, UpdateContentDto};
use crate::features::content::models::ContentWithRefs;
use crate::features::sections::models::Section;

const CONTENT_WITH_REFS: &str = r#"
    SELECT ct.id, ct.section_id, ct.slug, ct.title, ct.subtitle, ct.images, ct.fields,
           ct.is_active, ct.created_at, ct.updated_at,
           s.name AS section_name, s.slug AS section_slug, s.parent_id AS section_parent_id,
           c.id AS category_id, c.name AS category_name, c.slug AS category_slug
    FROM contents ct
    JOIN sections s ON s.id = ct.section_id
    JOIN categories c ON c.id = s.category_id
"#;

/// Service for content operations.
///
/// Pre-check then single-statement write, like the tree services. The
/// one-content-per-section invariant has a unique index as backstop; the
/// category-wide slug uniqueness spans the category's section set and is
/// enforced only by the pre-check query here.
pub struct ContentService {
    pool: PgPool,
}

impl ContentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List content records, optionally restricted to one section
    pub async fn list(&self, section_id: Option<Uuid>) -> Result<Vec<ContentResponseDto>> {
        let query = format!(
            "{} WHERE ($1::uuid IS NULL OR ct.section_id = $1) ORDER BY ct.created_at",
            CONTENT_WITH_REFS
        );
        let content = sqlx::query_as::<_, ContentWithRefs>(&query)
            .bind(section_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list content: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(content.into_iter().map(|c| c.into()).collect())
    }

    /// Get a content record by id
    pub async fn get_by_id(&self, id: Uuid) -> Result<ContentResponseDto> {
        let query = format!("{} WHERE ct.id = $1", CONTENT_WITH_REFS);
        let content = sqlx::query_as::<_, ContentWithRefs>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        Ok(content.into())
    }

    /// Get the content of a leaf section. Returns `None` when the section has
    /// no content yet; callers surface an empty skeleton, not an error.
    pub async fn get_by_section(&self, section_id: Uuid) -> Result<Option<ContentResponseDto>> {
        let section = self.find_section(section_id).await?.ok_or_else(|| {
            AppError::NotFound("Section not found".to_string())
        })?;

        if section.is_folder {
            return Err(AppError::Conflict(
                "Cannot get content for a folder section. Content can only be associated with leaf sections."
                    .to_string(),
            ));
        }

        let query = format!("{} WHERE ct.section_id = $1", CONTENT_WITH_REFS);
        let content = sqlx::query_as::<_, ContentWithRefs>(&query)
            .bind(section_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(content.map(|c| c.into()))
    }

    /// Every content record under one category (across all its sections)
    pub async fn get_by_category(&self, category_id: Uuid) -> Result<Vec<ContentResponseDto>> {
        self.assert_category_exists(category_id).await?;

        let query = format!(
            "{} WHERE s.category_id = $1 ORDER BY ct.created_at",
            CONTENT_WITH_REFS
        );
        let content = sqlx::query_as::<_, ContentWithRefs>(&query)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(content.into_iter().map(|c| c.into()).collect())
    }

    /// Resolve content by category and slug; the category-wide slug
    /// uniqueness makes this lookup unambiguous
    pub async fn get_by_category_and_slug(
        &self,
        category_id: Uuid,
        slug: &str,
    ) -> Result<ContentResponseDto> {
        self.assert_category_exists(category_id).await?;

        let section_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sections WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
        if section_count == 0 {
            return Err(AppError::NotFound(
                "No sections found in this category".to_string(),
            ));
        }

        let query = format!(
            "{} WHERE s.category_id = $1 AND ct.slug = $2",
            CONTENT_WITH_REFS
        );
        let content = sqlx::query_as::<_, ContentWithRefs>(&query)
            .bind(category_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| {
                AppError::NotFound(
                    "Content not found with this slug in the specified category".to_string(),
                )
            })?;

        Ok(content.into())
    }

    /// Create content on a leaf section
    pub async fn create(&self, dto: CreateContentDto) -> Result<ContentResponseDto> {
        let section = self.find_section(dto.section).await?.ok_or_else(|| {
            AppError::NotFound("Section not found".to_string())
        })?;

        let category_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM categories WHERE id = $1",
        )
        .bind(section.category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| {
            AppError::Conflict("Section must belong to a category".to_string())
        })?;

        if section.is_folder {
            return Err(AppError::Conflict(
                "Cannot create content for a folder section. Content can only be associated with leaf sections."
                    .to_string(),
            ));
        }

        let occupied = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM contents WHERE section_id = $1)",
        )
        .bind(dto.section)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;
        if occupied {
            return Err(AppError::Conflict(
                "Content already exists for this section. Use update instead.".to_string(),
            ));
        }

        let slug = match dto.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => {
                return Err(AppError::Validation(
                    "Slug is required for content".to_string(),
                ))
            }
        };

        self.check_slug_conflict(section.category_id, &category_name, &slug, None)
            .await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO contents (section_id, slug, title, subtitle, images, fields)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(dto.section)
        .bind(&slug)
        .bind(dto.title.unwrap_or_default())
        .bind(dto.subtitle.unwrap_or_default())
        .bind(Json(dto.images.unwrap_or_default()))
        .bind(Json(dto.fields.unwrap_or_default()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create content: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Content created: id={}, slug={}", id, slug);

        self.get_by_id(id).await
    }

    /// Partially update a content record
    pub async fn update(&self, id: Uuid, dto: UpdateContentDto) -> Result<ContentResponseDto> {
        let query = format!("{} WHERE ct.id = $1", CONTENT_WITH_REFS);
        let current = sqlx::query_as::<_, ContentWithRefs>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

        // Slug change re-enters the category-wide uniqueness scope
        if let Some(slug) = dto.slug.as_deref() {
            if slug != current.slug {
                self.check_slug_conflict(
                    current.category_id,
                    &current.category_name,
                    slug,
                    Some(id),
                )
                .await?;
            }
        }

        sqlx::query(
            r#"
            UPDATE contents
            SET slug = $2,
                title = $3,
                subtitle = $4,
                images = $5,
                fields = $6,
                is_active = $7,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.slug.unwrap_or(current.slug))
        .bind(dto.title.unwrap_or(current.title))
        .bind(dto.subtitle.unwrap_or(current.subtitle))
        .bind(Json(dto.images.unwrap_or(current.images.0)))
        .bind(Json(dto.fields.unwrap_or(current.fields.0)))
        .bind(dto.is_active.unwrap_or(current.is_active))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update content {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        self.get_by_id(id).await
    }

    /// Delete a content record. Content is always a leaf; no guards apply.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Content not found".to_string()));
        }

        tracing::info!("Content deleted: id={}", id);
        Ok(())
    }

    /// Delete every content record
    pub async fn delete_all(&self) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM contents")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        tracing::info!("All content deleted: count={}", deleted.rows_affected());
        Ok(deleted.rows_affected())
    }

    async fn find_section(&self, id: Uuid) -> Result<Option<Section>> {
        sqlx::query_as::<_, Section>(
            r#"
            SELECT id, category_id, parent_id, name, slug, description,
                   is_folder, display_order, is_active, created_at, updated_at
            FROM sections
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn assert_category_exists(&self, category_id: Uuid) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
        if !exists {
            return Err(AppError::NotFound("Category not found".to_string()));
        }
        Ok(())
    }

    /// Category-wide slug uniqueness: the candidate slug may not be used by
    /// any content attached to any section of the category
    async fn check_slug_conflict(
        &self,
        category_id: Uuid,
        category_name: &str,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM contents ct
                JOIN sections s ON s.id = ct.section_id
                WHERE s.category_id = $1
                  AND ct.slug = $2
                  AND ($3::uuid IS NULL OR ct.id <> $3)
            )
            "#,
        )
        .bind(category_id)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if taken {
            return Err(AppError::Conflict(format!(
                "Content with slug '{}' already exists in category '{}'. Please provide a unique slug.",
                slug, category_name
            )));
        }
        Ok(())
    }
}
