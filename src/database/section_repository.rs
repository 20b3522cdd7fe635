//! Section Record Repository
//!
//! Persistence for section records. Two kinds of rows share one table:
//!
//! - The single "current" generated record, keyed by the fixed `'current'`
//!   slot. Every generation replaces it wholesale (`ON CONFLICT DO
//!   UPDATE`), so concurrent generations race last-writer-wins.
//! - Manually saved records, inserted with a NULL slot, one row per save.
//!
//! No deletion, no pagination, no uniqueness beyond the slot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::SectionsError;
use crate::models::{SectionItem, SectionRecord, StoredSectionRecord};

/// Slot key of the single generated record.
const GENERATED_SLOT: &str = "current";

/// Store contract for section records.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Replace the single current generated record with the given data,
    /// creating it if absent. Returns the stored record.
    async fn upsert_generated(
        &self,
        record: &SectionRecord,
    ) -> Result<StoredSectionRecord, SectionsError>;

    /// Create a new record from caller-supplied sections. Persists only the
    /// first supplied item; the rest of the validated array is dropped
    /// (probable defect kept for wire compatibility, see DESIGN.md).
    async fn save_provided(
        &self,
        prompt: &str,
        sections: &[SectionItem],
    ) -> Result<StoredSectionRecord, SectionsError>;

    /// Every stored record in insertion order, no pagination.
    async fn list_all(&self) -> Result<Vec<StoredSectionRecord>, SectionsError>;
}

#[derive(Debug, FromRow)]
struct SectionRecordRow {
    record_id: Uuid,
    prompt: String,
    sections: Json<Vec<SectionItem>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SectionRecordRow> for StoredSectionRecord {
    fn from(row: SectionRecordRow) -> Self {
        Self {
            record_id: row.record_id,
            prompt: row.prompt,
            sections: row.sections.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Postgres-backed section store.
pub struct SectionRepository {
    pool: PgPool,
}

impl SectionRepository {
    /// Create a new repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SectionStore for SectionRepository {
    async fn upsert_generated(
        &self,
        record: &SectionRecord,
    ) -> Result<StoredSectionRecord, SectionsError> {
        let row = sqlx::query_as::<_, SectionRecordRow>(
            r#"
            INSERT INTO section_records (record_id, slot, prompt, sections, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (slot) DO UPDATE
            SET prompt = EXCLUDED.prompt,
                sections = EXCLUDED.sections,
                updated_at = NOW()
            RETURNING record_id, prompt, sections, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(GENERATED_SLOT)
        .bind(&record.prompt)
        .bind(Json(&record.sections))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn save_provided(
        &self,
        prompt: &str,
        sections: &[SectionItem],
    ) -> Result<StoredSectionRecord, SectionsError> {
        // Only sections[0] is persisted, no matter how many items were
        // validated upstream. Probable defect kept for wire compatibility
        // (see DESIGN.md).
        let first = sections
            .first()
            .ok_or_else(|| SectionsError::Validation("sections must not be empty".to_string()))?;

        let row = sqlx::query_as::<_, SectionRecordRow>(
            r#"
            INSERT INTO section_records (record_id, slot, prompt, sections, created_at, updated_at)
            VALUES ($1, NULL, $2, $3, NOW(), NOW())
            RETURNING record_id, prompt, sections, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(prompt)
        .bind(Json(std::slice::from_ref(first)))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_all(&self) -> Result<Vec<StoredSectionRecord>, SectionsError> {
        let rows = sqlx::query_as::<_, SectionRecordRow>(
            r#"
            SELECT record_id, prompt, sections, created_at, updated_at
            FROM section_records
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
