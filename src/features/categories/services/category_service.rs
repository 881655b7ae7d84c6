use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::Category;
use crate::shared::slug::slug_or_derive;

/// Service for category operations.
///
/// Integrity rules are enforced as pre-check queries followed by a single
/// mutation statement; the validate-then-write pair is not wrapped in a
/// transaction, so concurrent writers targeting the same sibling scope or
/// the same marker flag can race past each other's checks. The global
/// name/slug unique index is the only store-level backstop.
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List categories at one level of the tree (root level when no parent given)
    pub async fn list(&self, parent_id: Option<Uuid>) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, image, meta_tags,
                   recent, latest, most_used, trending, is_folder, is_active,
                   created_at, updated_at
            FROM categories
            WHERE parent_id IS NOT DISTINCT FROM $1::uuid
            ORDER BY name
            "#,
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get a category by id, with its direct children when it is a folder
    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryDetailDto> {
        let category = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let children = self.children_of(&category).await?;
        Ok(CategoryDetailDto::new(category, children))
    }

    /// Get a category by slug. Without a parent slug the lookup is scoped to
    /// the root level; with one, to that parent's children.
    pub async fn get_by_slug(
        &self,
        slug: &str,
        parent_slug: Option<&str>,
    ) -> Result<CategoryDetailDto> {
        let parent_id = match parent_slug {
            Some(parent_slug) => {
                let parent = sqlx::query_as::<_, Category>(
                    r#"
                    SELECT id, parent_id, name, slug, description, image, meta_tags,
                           recent, latest, most_used, trending, is_folder, is_active,
                           created_at, updated_at
                    FROM categories
                    WHERE slug = $1
                    "#,
                )
                .bind(parent_slug)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::NotFound("Parent category not found".to_string()))?;
                Some(parent.id)
            }
            None => None,
        };

        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, image, meta_tags,
                   recent, latest, most_used, trending, is_folder, is_active,
                   created_at, updated_at
            FROM categories
            WHERE slug = $1 AND parent_id IS NOT DISTINCT FROM $2::uuid
            "#,
        )
        .bind(slug)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let children = self.children_of(&category).await?;
        Ok(CategoryDetailDto::new(category, children))
    }

    /// Create a category. The newest category takes over the `recent` flag.
    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        if let Some(parent_id) = dto.parent {
            let parent = self
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent category not found".to_string()))?;
            if !parent.is_folder {
                return Err(AppError::Conflict("Parent must be a folder".to_string()));
            }
        }

        let slug = slug_or_derive(dto.slug.as_deref(), &dto.name);

        self.check_sibling_conflict(dto.parent, &dto.name, &slug, None)
            .await?;

        // Hand the `recent` marker to the category being created
        sqlx::query("UPDATE categories SET recent = FALSE, updated_at = NOW() WHERE recent")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (parent_id, name, slug, description, image, meta_tags, is_folder, recent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
            RETURNING id, parent_id, name, slug, description, image, meta_tags,
                      recent, latest, most_used, trending, is_folder, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(dto.parent)
        .bind(&dto.name)
        .bind(&slug)
        .bind(&dto.description)
        .bind(&dto.image)
        .bind(&dto.meta_tags)
        .bind(dto.is_folder.unwrap_or(true))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create category: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Category created: id={}, slug={}", category.id, category.slug);

        Ok(category.into())
    }

    /// Partially update a category
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        // Reparent guard: target must exist, be a folder, and not sit in the
        // subtree rooted at this category
        if let Some(Some(parent_id)) = dto.parent {
            let parent = self
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent category not found".to_string()))?;
            if !parent.is_folder {
                return Err(AppError::Conflict("Parent must be a folder".to_string()));
            }
            if parent_id == id {
                return Err(AppError::Conflict(
                    "A category cannot be its own parent".to_string(),
                ));
            }
            if self.is_descendant_or_self(parent_id, id).await? {
                return Err(AppError::Conflict(
                    "A category cannot be moved under one of its descendants".to_string(),
                ));
            }
        }

        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        // Sibling uniqueness in the effective scope, against the candidate
        // name and slug (derived from the new name when no slug is supplied)
        if dto.name.is_some() || dto.slug.is_some() {
            let candidate_name = dto.name.clone().unwrap_or_else(|| current.name.clone());
            let candidate_slug = match (&dto.slug, &dto.name) {
                (Some(slug), _) => slug.clone(),
                (None, Some(name)) => slug_or_derive(None, name),
                (None, None) => current.slug.clone(),
            };
            let effective_parent = match dto.parent {
                Some(parent) => parent,
                None => current.parent_id,
            };

            self.check_sibling_conflict(effective_parent, &candidate_name, &candidate_slug, Some(id))
                .await?;
        }

        self.check_flag_conflicts(id, &dto).await?;

        let merged_parent = match dto.parent {
            Some(parent) => parent,
            None => current.parent_id,
        };

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET parent_id = $2,
                name = $3,
                slug = $4,
                description = $5,
                image = $6,
                meta_tags = $7,
                recent = $8,
                latest = $9,
                most_used = $10,
                trending = $11,
                is_folder = $12,
                is_active = $13,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, parent_id, name, slug, description, image, meta_tags,
                      recent, latest, most_used, trending, is_folder, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(merged_parent)
        .bind(dto.name.unwrap_or(current.name))
        .bind(dto.slug.unwrap_or(current.slug))
        .bind(dto.description.unwrap_or(current.description))
        .bind(dto.image.unwrap_or(current.image))
        .bind(dto.meta_tags.unwrap_or(current.meta_tags))
        .bind(dto.recent.unwrap_or(current.recent))
        .bind(dto.latest.unwrap_or(current.latest))
        .bind(dto.most_used.unwrap_or(current.most_used))
        .bind(dto.trending.unwrap_or(current.trending))
        .bind(dto.is_folder.unwrap_or(current.is_folder))
        .bind(dto.is_active.unwrap_or(current.is_active))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(category.into())
    }

    /// Delete a category. Refused while child categories or sections remain.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let child_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if child_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete category with subcategories. Delete subcategories first or move them. (childCount: {})",
                child_count
            )));
        }

        let section_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sections WHERE category_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if section_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete category while sections belong to it. Delete or move its sections first. (childCount: {})",
                section_count
            )));
        }

        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }

    /// Delete every category. Refused while the collection is still nested
    /// (any row with a parent) or while any section exists.
    pub async fn delete_all(&self) -> Result<u64> {
        let nested_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE parent_id IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if nested_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete all categories while there are subcategories. Delete subcategories first. (subcategoryCount: {})",
                nested_count
            )));
        }

        let section_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sections")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if section_count > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete all categories while sections exist. Delete sections first. (sectionCount: {})",
                section_count
            )));
        }

        let deleted = sqlx::query("DELETE FROM categories")
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        tracing::info!("All categories deleted: count={}", deleted.rows_affected());
        Ok(deleted.rows_affected())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, image, meta_tags,
                   recent, latest, most_used, trending, is_folder, is_active,
                   created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn children_of(&self, category: &Category) -> Result<Vec<Category>> {
        if !category.is_folder {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, parent_id, name, slug, description, image, meta_tags,
                   recent, latest, most_used, trending, is_folder, is_active,
                   created_at, updated_at
            FROM categories
            WHERE parent_id = $1
            ORDER BY name
            "#,
        )
        .bind(category.id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    /// Sibling uniqueness: no other category at the same level may share the
    /// candidate name or slug
    async fn check_sibling_conflict(
        &self,
        parent_id: Option<Uuid>,
        name: &str,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<()> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM categories
            WHERE parent_id IS NOT DISTINCT FROM $1::uuid
              AND (name = $2 OR slug = $3)
              AND ($4::uuid IS NULL OR id <> $4)
            LIMIT 1
            "#,
        )
        .bind(parent_id)
        .bind(name)
        .bind(slug)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "Category with this name or slug already exists at this level".to_string(),
            ));
        }
        Ok(())
    }

    /// Marker flags are singletons: setting one fails while another category
    /// holds it
    async fn check_flag_conflicts(&self, id: Uuid, dto: &UpdateCategoryDto) -> Result<()> {
        let flags = [
            (dto.most_used, "most_used", "most used"),
            (dto.recent, "recent", "recent"),
            (dto.latest, "latest", "latest"),
            (dto.trending, "trending", "trending"),
        ];

        for (requested, column, label) in flags {
            if requested != Some(true) {
                continue;
            }
            let query = format!(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE {} AND id <> $1)",
                column
            );
            let taken = sqlx::query_scalar::<_, bool>(&query)
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

            if taken {
                return Err(AppError::Conflict(format!(
                    "Another category is already marked as {}",
                    label
                )));
            }
        }
        Ok(())
    }

    /// Walks the ancestor chain upward from `start`; true when `node` is
    /// `start` itself or one of its ancestors. Used to reject reparenting a
    /// category under its own subtree.
    async fn is_descendant_or_self(&self, start: Uuid, node: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            WITH RECURSIVE ancestors AS (
                SELECT id, parent_id FROM categories WHERE id = $1
                UNION ALL
                SELECT c.id, c.parent_id
                FROM categories c
                JOIN ancestors a ON c.id = a.parent_id
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
