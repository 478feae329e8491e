use async_trait::async_trait;
use motorent_core::{DelivererId, MotorcycleId, Rental, RentalId, RentalWithRelated};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{MotorentError, Result};
use crate::storage::deliverers::deliverer_from_row;
use crate::storage::motorcycles::motorcycle_from_row;
use crate::storage::{
    audit_stamps_from_row, map_read_error, map_write_error, stamped_for_insert, stamped_for_update,
};

/// Rental persistence and the joined lookups the lifecycle needs.
#[async_trait]
pub trait RentalRepository: Send + Sync {
    async fn add(&self, rental: &Rental) -> Result<()>;
    async fn update(&self, rental: &Rental) -> Result<()>;
    async fn find_by_id(&self, id: &RentalId) -> Result<Option<Rental>>;
    /// Rental plus the motorcycle and deliverer it references. The
    /// related rows are fetched regardless of their deletion flag.
    async fn find_by_id_with_related(&self, id: &RentalId) -> Result<Option<RentalWithRelated>>;
    async fn find_by_motorcycle_id(&self, motorcycle_id: &MotorcycleId) -> Result<Vec<Rental>>;
    async fn find_by_deliverer_id(&self, deliverer_id: &DelivererId) -> Result<Vec<Rental>>;
}

pub struct SqlRentalRepository {
    pool: PgPool,
    audit_actor: String,
}

impl SqlRentalRepository {
    pub fn new(pool: PgPool, audit_actor: String) -> Self {
        Self { pool, audit_actor }
    }
}

fn rental_from_row(r: &PgRow) -> Rental {
    Rental {
        id: RentalId::from_uuid(r.get("id")),
        plan_days: r.get("plan_days"),
        start_date: r.get("start_date"),
        end_date: r.get("end_date"),
        estimating_ending_date: r.get("estimating_ending_date"),
        deliverer_id: DelivererId::from_uuid(r.get("deliverer_id")),
        motorcycle_id: MotorcycleId::from_uuid(r.get("motorcycle_id")),
        return_date: r.get("return_date"),
        stamps: audit_stamps_from_row(r),
    }
}

#[async_trait]
impl RentalRepository for SqlRentalRepository {
    async fn add(&self, rental: &Rental) -> Result<()> {
        let record = stamped_for_insert(rental, &self.audit_actor);

        sqlx::query(
            r#"
            INSERT INTO motorent.rentals
            (id, plan_days, start_date, end_date, estimating_ending_date,
             deliverer_id, motorcycle_id, return_date,
             created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.plan_days)
        .bind(record.start_date)
        .bind(record.end_date)
        .bind(record.estimating_ending_date)
        .bind(record.deliverer_id.as_uuid())
        .bind(record.motorcycle_id.as_uuid())
        .bind(record.return_date)
        .bind(record.stamps.created_at)
        .bind(&record.stamps.created_by)
        .bind(record.stamps.updated_at)
        .bind(&record.stamps.updated_by)
        .bind(record.stamps.is_deleted)
        .bind(record.stamps.deleted_at)
        .bind(&record.stamps.deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("add_rental", e))?;

        Ok(())
    }

    async fn update(&self, rental: &Rental) -> Result<()> {
        let record = stamped_for_update(rental, &self.audit_actor);

        let result = sqlx::query(
            r#"
            UPDATE motorent.rentals
            SET plan_days = $2, start_date = $3, end_date = $4,
                estimating_ending_date = $5, return_date = $6,
                updated_at = $7, updated_by = $8
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.plan_days)
        .bind(record.start_date)
        .bind(record.end_date)
        .bind(record.estimating_ending_date)
        .bind(record.return_date)
        .bind(record.stamps.updated_at)
        .bind(&record.stamps.updated_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("update_rental", e))?;

        if result.rows_affected() == 0 {
            return Err(MotorentError::RentalNotFound {
                id: rental.id.to_string(),
            });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &RentalId) -> Result<Option<Rental>> {
        let row = sqlx::query(
            r#"
            SELECT id, plan_days, start_date, end_date, estimating_ending_date,
                   deliverer_id, motorcycle_id, return_date,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.rentals
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_rental_by_id", e))?;

        Ok(row.map(|r| rental_from_row(&r)))
    }

    async fn find_by_id_with_related(&self, id: &RentalId) -> Result<Option<RentalWithRelated>> {
        let Some(rental) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let motorcycle_row = sqlx::query(
            r#"
            SELECT id, identifier, year, model, plate_number,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.motorcycles
            WHERE id = $1
            "#,
        )
        .bind(rental.motorcycle_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_rental_motorcycle", e))?;

        let deliverer_row = sqlx::query(
            r#"
            SELECT id, identifier, name, business_tax_id, date_of_birth,
                   driver_license_number, driver_license_type, driver_license_image_key,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.deliverers
            WHERE id = $1
            "#,
        )
        .bind(rental.deliverer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_rental_deliverer", e))?;

        match (motorcycle_row, deliverer_row) {
            (Some(m), Some(d)) => Ok(Some(RentalWithRelated {
                rental,
                motorcycle: motorcycle_from_row(&m),
                deliverer: deliverer_from_row(&d),
            })),
            _ => Ok(None),
        }
    }

    async fn find_by_motorcycle_id(&self, motorcycle_id: &MotorcycleId) -> Result<Vec<Rental>> {
        let rows = sqlx::query(
            r#"
            SELECT id, plan_days, start_date, end_date, estimating_ending_date,
                   deliverer_id, motorcycle_id, return_date,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.rentals
            WHERE motorcycle_id = $1 AND NOT is_deleted
            ORDER BY created_at
            "#,
        )
        .bind(motorcycle_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error("find_rentals_by_motorcycle", e))?;

        Ok(rows.iter().map(rental_from_row).collect())
    }

    async fn find_by_deliverer_id(&self, deliverer_id: &DelivererId) -> Result<Vec<Rental>> {
        let rows = sqlx::query(
            r#"
            SELECT id, plan_days, start_date, end_date, estimating_ending_date,
                   deliverer_id, motorcycle_id, return_date,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.rentals
            WHERE deliverer_id = $1 AND NOT is_deleted
            ORDER BY created_at
            "#,
        )
        .bind(deliverer_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_read_error("find_rentals_by_deliverer", e))?;

        Ok(rows.iter().map(rental_from_row).collect())
    }
}
