//! Repository for the `projects` table.
//!
//! Every write serializes the whole [`Project`] into the `doc` JSONB
//! column, preserving the nested act/scene/codex structure (including
//! base64 image payloads) with full fidelity. Reads deserialize the
//! document straight back — the scalar columns exist only so listings can
//! filter and order without touching the document.

use inkstone_core::model::Project;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;

/// Provides save/load/delete for whole project documents.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert or fully replace a project document.
    pub async fn upsert(pool: &PgPool, project: &Project) -> Result<(), StoreError> {
        let doc = serde_json::to_value(project)?;
        sqlx::query(
            "INSERT INTO projects (id, owner_id, title, genre, tags, word_count, last_edited, doc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                genre = EXCLUDED.genre,
                tags = EXCLUDED.tags,
                word_count = EXCLUDED.word_count,
                last_edited = EXCLUDED.last_edited,
                doc = EXCLUDED.doc,
                updated_at = NOW()",
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(&project.title)
        .bind(&project.genre)
        .bind(&project.tags)
        .bind(i64::from(project.word_count))
        .bind(project.last_edited)
        .bind(&doc)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Load a single project by id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Project>, StoreError> {
        let doc: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT doc FROM projects WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        match doc {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Load every project owned by a user, most recently edited first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Project>, StoreError> {
        let docs: Vec<serde_json::Value> = sqlx::query_scalar(
            "SELECT doc FROM projects WHERE owner_id = $1 ORDER BY last_edited DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    /// Permanently delete a project. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
