use async_trait::async_trait;
use motorent_core::{Motorcycle, MotorcycleId, PagedResult};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{MotorentError, Result};
use crate::storage::{
    audit_stamps_from_row, map_read_error, map_write_error, stamped_for_insert, stamped_for_update,
};

/// Fleet persistence. Writes stamp the audit columns; reads exclude
/// soft-deleted rows unless the method says otherwise.
#[async_trait]
pub trait MotorcycleRepository: Send + Sync {
    async fn add(&self, motorcycle: &Motorcycle) -> Result<()>;
    async fn update(&self, motorcycle: &Motorcycle) -> Result<()>;
    /// Soft delete: flags the row and stamps the deletion.
    async fn delete(&self, id: &MotorcycleId) -> Result<()>;
    async fn find_by_id(&self, id: &MotorcycleId) -> Result<Option<Motorcycle>>;
    /// Matches rows whose deletion flag equals `deleted`.
    async fn find_by_plate(&self, plate_number: &str, deleted: bool) -> Result<Option<Motorcycle>>;
    async fn list_page(&self, page_number: i32, page_size: i32) -> Result<PagedResult<Motorcycle>>;
}

pub struct SqlMotorcycleRepository {
    pool: PgPool,
    audit_actor: String,
}

impl SqlMotorcycleRepository {
    pub fn new(pool: PgPool, audit_actor: String) -> Self {
        Self { pool, audit_actor }
    }
}

pub(crate) fn motorcycle_from_row(r: &PgRow) -> Motorcycle {
    Motorcycle {
        id: MotorcycleId::from_uuid(r.get("id")),
        identifier: r.get("identifier"),
        year: r.get("year"),
        model: r.get("model"),
        plate_number: r.get("plate_number"),
        stamps: audit_stamps_from_row(r),
    }
}

#[async_trait]
impl MotorcycleRepository for SqlMotorcycleRepository {
    async fn add(&self, motorcycle: &Motorcycle) -> Result<()> {
        let record = stamped_for_insert(motorcycle, &self.audit_actor);

        sqlx::query(
            r#"
            INSERT INTO motorent.motorcycles
            (id, identifier, year, model, plate_number,
             created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.identifier)
        .bind(record.year)
        .bind(&record.model)
        .bind(&record.plate_number)
        .bind(record.stamps.created_at)
        .bind(&record.stamps.created_by)
        .bind(record.stamps.updated_at)
        .bind(&record.stamps.updated_by)
        .bind(record.stamps.is_deleted)
        .bind(record.stamps.deleted_at)
        .bind(&record.stamps.deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("add_motorcycle", e))?;

        Ok(())
    }

    async fn update(&self, motorcycle: &Motorcycle) -> Result<()> {
        let record = stamped_for_update(motorcycle, &self.audit_actor);

        let result = sqlx::query(
            r#"
            UPDATE motorent.motorcycles
            SET identifier = $2, year = $3, model = $4, plate_number = $5,
                updated_at = $6, updated_by = $7
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.identifier)
        .bind(record.year)
        .bind(&record.model)
        .bind(&record.plate_number)
        .bind(record.stamps.updated_at)
        .bind(&record.stamps.updated_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("update_motorcycle", e))?;

        if result.rows_affected() == 0 {
            return Err(MotorentError::MotorcycleNotFound {
                id: motorcycle.id.to_string(),
            });
        }

        Ok(())
    }

    async fn delete(&self, id: &MotorcycleId) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE motorent.motorcycles
            SET is_deleted = TRUE, deleted_at = $2, deleted_by = $3
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id.as_uuid())
        .bind(chrono::Utc::now())
        .bind(&self.audit_actor)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("delete_motorcycle", e))?;

        if result.rows_affected() == 0 {
            return Err(MotorentError::MotorcycleNotFound { id: id.to_string() });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &MotorcycleId) -> Result<Option<Motorcycle>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, year, model, plate_number,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.motorcycles
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_motorcycle_by_id", e))?;

        Ok(row.map(|r| motorcycle_from_row(&r)))
    }

    async fn find_by_plate(&self, plate_number: &str, deleted: bool) -> Result<Option<Motorcycle>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, year, model, plate_number,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.motorcycles
            WHERE plate_number = $1 AND is_deleted = $2
            "#,
        )
        .bind(plate_number)
        .bind(deleted)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_motorcycle_by_plate", e))?;

        Ok(row.map(|r| motorcycle_from_row(&r)))
    }

    async fn list_page(&self, page_number: i32, page_size: i32) -> Result<PagedResult<Motorcycle>> {
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);
        let offset = (page_number as i64 - 1) * page_size as i64;

        let total_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM motorent.motorcycles WHERE NOT is_deleted")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_read_error("count_motorcycles", e))?;

        let rows = sqlx::query(
            r#"
            SELECT id, identifier, year, model, plate_number,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.motorcycles
            WHERE NOT is_deleted
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error("list_motorcycles", e))?;

        Ok(PagedResult::new(
            rows.iter().map(motorcycle_from_row).collect(),
            total_count,
            page_size,
            page_number,
        ))
    }
}
