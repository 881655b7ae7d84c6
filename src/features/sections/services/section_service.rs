use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryRefDto;
use crate::features::sections::dtos::{
    CreateSectionDto, SectionDetailDto, SectionResponseDto, SectionsByCategoryDto,
    UpdateSectionDto,
};
use crate::features::sections::models::{Section, SectionWithCategory};
use crate::shared::slug::slug_or_derive;

const SECTION_WITH_CATEGORY: &str = r#"
    SELECT s.id, s.category_id, s.parent_id, s.name, s.slug, s.description,
           s.is_folder, s.display_order, s.is_active, s.created_at, s.updated_at,
           c.name AS category_name, c.slug AS category_slug
    FROM sections s
    JOIN categories c ON c.id = s.category_id
"#;

/// Service for section operations.
///
/// Same write model as categories: pre-check queries, then one mutation
/// statement, no transaction around the pair. Sibling uniqueness is scoped to
/// (category, parent) and enforced best-effort at this layer; the invariant
/// that a section's parent lives in the same category is checked on every
/// create, reparent, and category move.
pub struct SectionService {
    pool: PgPool,
}

impl SectionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List sections at one level (root of their category when no parent
    /// given), optionally filtered to one category
    pub async fn list(
        &self,
        category_id: Option<Uuid>,
        parent_id: Option<Uuid>,
    ) -> Result<Vec<SectionResponseDto>> {
        let query = format!(
            "{} WHERE ($1::uuid IS NULL OR s.category_id = $1) AND s.parent_id IS NOT DISTINCT FROM $2::uuid ORDER BY s.display_order, s.name",
            SECTION_WITH_CATEGORY
        );
        let sections = sqlx::query_as::<_, SectionWithCategory>(&query)
            .bind(category_id)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list sections: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(sections.into_iter().map(|s| s.into()).collect())
    }

    /// Get a section by id, with its direct children when it is a folder
    pub async fn get_by_id(&self, id: Uuid) -> Result<SectionDetailDto> {
        let section = self
            .find_with_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

        let children = self.children_of(&section).await?;
        Ok(SectionDetailDto::new(section, children))
    }

    /// Resolve a section through its category slug, optional parent section
    /// slug, and its own slug
    pub async fn get_by_slug(
        &self,
        category_slug: &str,
        parent_slug: Option<&str>,
        section_slug: &str,
    ) -> Result<SectionDetailDto> {
        let category_id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM categories WHERE slug = $1")
            .bind(category_slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let parent_id = match parent_slug {
            Some(parent_slug) => {
                let parent = sqlx::query_scalar::<_, Uuid>(
                    "SELECT id FROM sections WHERE category_id = $1 AND slug = $2",
                )
                .bind(category_id)
                .bind(parent_slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::NotFound("Parent section not found".to_string()))?;
                Some(parent)
            }
            None => None,
        };

        let query = format!(
            "{} WHERE s.slug = $1 AND s.category_id = $2 AND s.parent_id IS NOT DISTINCT FROM $3::uuid",
            SECTION_WITH_CATEGORY
        );
        let section = sqlx::query_as::<_, SectionWithCategory>(&query)
            .bind(section_slug)
            .bind(category_id)
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

        let children = self.children_of(&section).await?;
        Ok(SectionDetailDto::new(section, children))
    }

    /// Every section of one category, flat, with a category summary
    pub async fn list_by_category(&self, category_id: Uuid) -> Result<SectionsByCategoryDto> {
        let category = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, name, slug FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let query = format!(
            "{} WHERE s.category_id = $1 ORDER BY s.display_order, s.name",
            SECTION_WITH_CATEGORY
        );
        let sections = sqlx::query_as::<_, SectionWithCategory>(&query)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(SectionsByCategoryDto {
            category: CategoryRefDto {
                id: category.0,
                name: category.1,
                slug: category.2,
            },
            sections: sections.into_iter().map(|s| s.into()).collect(),
        })
    }

    /// Create a section under an existing category, optionally nested under a
    /// folder section of that category
    pub async fn create(&self, dto: CreateSectionDto) -> Result<SectionResponseDto> {
        let category_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(dto.category)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
        if !category_exists {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        if let Some(parent_id) = dto.parent {
            let parent = self
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent section not found".to_string()))?;
            if !parent.is_folder {
                return Err(AppError::Conflict("Parent must be a folder".to_string()));
            }
            if parent.category_id != dto.category {
                return Err(AppError::Conflict(
                    "Parent section must be in the same category".to_string(),
                ));
            }
        }

        let slug = slug_or_derive(dto.slug.as_deref(), &dto.name);

        self.check_sibling_conflict(dto.category, dto.parent, &dto.name, &slug, None)
            .await?;

        let section = sqlx::query_as::<_, Section>(
            r#"
            INSERT INTO sections (category_id, parent_id, name, slug, description, is_folder, display_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, category_id, parent_id, name, slug, description,
                      is_folder, display_order, is_active, created_at, updated_at
            "#,
        )
        .bind(dto.category)
        .bind(dto.parent)
        .bind(&dto.name)
        .bind(&slug)
        .bind(&dto.description)
        .bind(dto.is_folder.unwrap_or(true))
        .bind(dto.display_order.unwrap_or(0))
        .bind(dto.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create section: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Section created: id={}, slug={}", section.id, section.slug);

        let created = self
            .find_with_category(section.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;
        Ok(created.into())
    }

    /// Partially update a section
    pub async fn update(&self, id: Uuid, dto: UpdateSectionDto) -> Result<SectionResponseDto> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

        // Effective owning category after this update
        let category_id = match dto.category {
            Some(category_id) => {
                let exists = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
                )
                .bind(category_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;
                if !exists {
                    return Err(AppError::NotFound("Category not found".to_string()));
                }
                category_id
            }
            None => current.category_id,
        };

        let effective_parent = match dto.parent {
            Some(parent) => parent,
            None => current.parent_id,
        };

        // Reparent guard: target must exist, be a folder, share the effective
        // category, and not sit in the subtree rooted at this section
        if let Some(Some(parent_id)) = dto.parent {
            let parent = self
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent section not found".to_string()))?;
            if !parent.is_folder {
                return Err(AppError::Conflict("Parent must be a folder".to_string()));
            }
            if parent.category_id != category_id {
                return Err(AppError::Conflict(
                    "Parent section must be in the same category".to_string(),
                ));
            }
            if parent_id == id {
                return Err(AppError::Conflict(
                    "A section cannot be its own parent".to_string(),
                ));
            }
            if self.is_descendant_or_self(parent_id, id).await? {
                return Err(AppError::Conflict(
                    "A section cannot be moved under one of its descendants".to_string(),
                ));
            }
        }

        // Moving to another category: the retained parent must live there,
        // and children would be stranded in the old category
        if category_id != current.category_id {
            if dto.parent.is_none() {
                if let Some(parent_id) = current.parent_id {
                    let parent = self
                        .find_by_id(parent_id)
                        .await?
                        .ok_or_else(|| AppError::NotFound("Parent section not found".to_string()))?;
                    if parent.category_id != category_id {
                        return Err(AppError::Conflict(
                            "Parent section must be in the same category".to_string(),
                        ));
                    }
                }
            }

            let child_count =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sections WHERE parent_id = $1")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(AppError::Database)?;
            if child_count > 0 {
                return Err(AppError::Conflict(format!(
                    "Cannot move section to another category while it has subsections. (childCount: {})",
                    child_count
                )));
            }
        }

        // Sibling uniqueness in the effective (category, parent) scope
        if dto.name.is_some() || dto.slug.is_some() {
            let candidate_name = dto.name.clone().unwrap_or_else(|| current.name.clone());
            let candidate_slug = match (&dto.slug, &dto.name) {
                (Some(slug), _) => slug.clone(),
                (None, Some(name)) => slug_or_derive(None, name),
                (None, None) => current.slug.clone(),
            };

            self.check_sibling_conflict(
                category_id,
                effective_parent,
                &candidate_name,
                &candidate_slug,
                Some(id),
            )
            .await?;
        }

        let section = sqlx::query_as::<_, Section>(
            r#"
            UPDATE sections
            SET category_id = $2,
                parent_id = $3,
                name = $4,
                slug = $5,
                description = $6,
                is_folder = $7,
                display_order = $8,
                is_active = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, category_id, parent_id, name, slug, description,
                      is_folder, display_order, is_active, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(category_id)
        .bind(effective_parent)
        .bind(dto.name.unwrap_or(current.name))
        .bind(dto.slug.unwrap_or(current.slug))
        .bind(dto.description.unwrap_or(current.description))
        .bind(dto.is_folder.unwrap_or(current.is_folder))
        .bind(dto.display_order.unwrap_or(current.display_order))
        .bind(dto.is_active.unwrap_or(current.is_active))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update section {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        let updated = self
            .find_with_category(section.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;
        Ok(updated.into())
    }

    /// Delete a section. Refused while child sections or attached content
    /// remain.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let child_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sections WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if child_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete section with subsections. Delete subsections first or move them. (childCount: {})",
                child_count
            )));
        }

        let content_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contents WHERE section_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if content_count > 0 {
            return Err(AppError::Conflict(
                "Cannot delete section while content is attached to it. Delete the content first."
                    .to_string(),
            ));
        }

        let deleted = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Section not found".to_string()));
        }

        tracing::info!("Section deleted: id={}", id);
        Ok(())
    }

    /// Delete every section. Refused while the collection is still nested or
    /// while any content row exists.
    pub async fn delete_all(&self) -> Result<u64> {
        let nested_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sections WHERE parent_id IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if nested_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete all sections while there are subsections. Delete subsections first. (subsectionCount: {})",
                nested_count
            )));
        }

        let content_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contents")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if content_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete all sections while content exists. Delete content first. (contentCount: {})",
                content_count
            )));
        }

        let deleted = sqlx::query("DELETE FROM sections")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        tracing::info!("All sections deleted: count={}", deleted.rows_affected());
        Ok(deleted.rows_affected())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Section>> {
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

    async fn find_with_category(&self, id: Uuid) -> Result<Option<SectionWithCategory>> {
        let query = format!("{} WHERE s.id = $1", SECTION_WITH_CATEGORY);
        sqlx::query_as::<_, SectionWithCategory>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn children_of(&self, section: &SectionWithCategory) -> Result<Vec<SectionWithCategory>> {
        if !section.is_folder {
            return Ok(Vec::new());
        }

        let query = format!(
            "{} WHERE s.parent_id = $1 ORDER BY s.display_order, s.name",
            SECTION_WITH_CATEGORY
        );
        sqlx::query_as::<_, SectionWithCategory>(&query)
            .bind(section.id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    /// Sibling uniqueness: no other section in the same (category, parent)
    /// scope may share the candidate name or slug
    async fn check_sibling_conflict(
        &self,
        category_id: Uuid,
        parent_id: Option<Uuid>,
        name: &str,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<()> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM sections
            WHERE category_id = $1
              AND parent_id IS NOT DISTINCT FROM $2::uuid
              AND (name = $3 OR slug = $4)
              AND ($5::uuid IS NULL OR id <> $5)
            LIMIT 1
            "#,
        )
        .bind(category_id)
        .bind(parent_id)
        .bind(name)
        .bind(slug)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "Section with this name or slug already exists at this level".to_string(),
            ));
        }
        Ok(())
    }

    /// Walks the ancestor chain upward from `start`; true when `node` is
    /// `start` itself or one of its ancestors
    async fn is_descendant_or_self(&self, start: Uuid, node: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            WITH RECURSIVE ancestors AS (
                SELECT id, parent_id FROM sections WHERE id = $1
                UNION ALL
                SELECT s.id, s.parent_id
                FROM sections s
                JOIN ancestors a ON s.id = a.parent_id
            )
            SELECT EXISTS(SELECT 1 FROM ancestors WHERE id = $2)
            "#,
        )
        .bind(start)
        .bind(node)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
