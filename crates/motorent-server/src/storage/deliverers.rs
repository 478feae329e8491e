use async_trait::async_trait;
use motorent_core::{Deliverer, DelivererId, DriverLicenseType};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::{MotorentError, Result};
use crate::storage::{
    audit_stamps_from_row, map_read_error, map_write_error, stamped_for_insert, stamped_for_update,
};

/// Deliverer persistence. The business tax id and the driver license
/// number are each backed by a unique index.
#[async_trait]
pub trait DelivererRepository: Send + Sync {
    async fn add(&self, deliverer: &Deliverer) -> Result<()>;
    async fn update(&self, deliverer: &Deliverer) -> Result<()>;
    async fn find_by_id(&self, id: &DelivererId) -> Result<Option<Deliverer>>;
    async fn find_by_business_tax_id(&self, business_tax_id: &str) -> Result<Option<Deliverer>>;
    async fn find_by_driver_license_number(
        &self,
        driver_license_number: &str,
    ) -> Result<Option<Deliverer>>;
}

pub struct SqlDelivererRepository {
    pool: PgPool,
    audit_actor: String,
}

impl SqlDelivererRepository {
    pub fn new(pool: PgPool, audit_actor: String) -> Self {
        Self { pool, audit_actor }
    }
}

pub(crate) fn deliverer_from_row(r: &PgRow) -> Deliverer {
    let type_code: i16 = r.get("driver_license_type");

    Deliverer {
        id: DelivererId::from_uuid(r.get("id")),
        identifier: r.get("identifier"),
        name: r.get("name"),
        business_tax_id: r.get("business_tax_id"),
        date_of_birth: r.get("date_of_birth"),
        driver_license_number: r.get("driver_license_number"),
        // Unknown codes read back as B, the most restrictive category.
        driver_license_type: DriverLicenseType::from_code(type_code)
            .unwrap_or(DriverLicenseType::B),
        driver_license_image_key: r.get("driver_license_image_key"),
        stamps: audit_stamps_from_row(r),
    }
}

#[async_trait]
impl DelivererRepository for SqlDelivererRepository {
    async fn add(&self, deliverer: &Deliverer) -> Result<()> {
        let record = stamped_for_insert(deliverer, &self.audit_actor);

        sqlx::query(
            r#"
            INSERT INTO motorent.deliverers
            (id, identifier, name, business_tax_id, date_of_birth,
             driver_license_number, driver_license_type, driver_license_image_key,
             created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.identifier)
        .bind(&record.name)
        .bind(&record.business_tax_id)
        .bind(record.date_of_birth)
        .bind(&record.driver_license_number)
        .bind(record.driver_license_type.code())
        .bind(&record.driver_license_image_key)
        .bind(record.stamps.created_at)
        .bind(&record.stamps.created_by)
        .bind(record.stamps.updated_at)
        .bind(&record.stamps.updated_by)
        .bind(record.stamps.is_deleted)
        .bind(record.stamps.deleted_at)
        .bind(&record.stamps.deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("add_deliverer", e))?;

        Ok(())
    }

    async fn update(&self, deliverer: &Deliverer) -> Result<()> {
        let record = stamped_for_update(deliverer, &self.audit_actor);

        let result = sqlx::query(
            r#"
            UPDATE motorent.deliverers
            SET identifier = $2, name = $3, business_tax_id = $4, date_of_birth = $5,
                driver_license_number = $6, driver_license_type = $7,
                driver_license_image_key = $8, updated_at = $9, updated_by = $10
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.identifier)
        .bind(&record.name)
        .bind(&record.business_tax_id)
        .bind(record.date_of_birth)
        .bind(&record.driver_license_number)
        .bind(record.driver_license_type.code())
        .bind(&record.driver_license_image_key)
        .bind(record.stamps.updated_at)
        .bind(&record.stamps.updated_by)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("update_deliverer", e))?;

        if result.rows_affected() == 0 {
            return Err(MotorentError::DelivererNotFound {
                id: deliverer.id.to_string(),
            });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &DelivererId) -> Result<Option<Deliverer>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, name, business_tax_id, date_of_birth,
                   driver_license_number, driver_license_type, driver_license_image_key,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.deliverers
            WHERE id = $1 AND NOT is_deleted
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_deliverer_by_id", e))?;

        Ok(row.map(|r| deliverer_from_row(&r)))
    }

    async fn find_by_business_tax_id(&self, business_tax_id: &str) -> Result<Option<Deliverer>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, name, business_tax_id, date_of_birth,
                   driver_license_number, driver_license_type, driver_license_image_key,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.deliverers
            WHERE business_tax_id = $1 AND NOT is_deleted
            "#,
        )
        .bind(business_tax_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_deliverer_by_business_tax_id", e))?;

        Ok(row.map(|r| deliverer_from_row(&r)))
    }

    async fn find_by_driver_license_number(
        &self,
        driver_license_number: &str,
    ) -> Result<Option<Deliverer>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, name, business_tax_id, date_of_birth,
                   driver_license_number, driver_license_type, driver_license_image_key,
                   created_at, created_by, updated_at, updated_by, is_deleted, deleted_at, deleted_by
            FROM motorent.deliverers
            WHERE driver_license_number = $1 AND NOT is_deleted
            "#,
        )
        .bind(driver_license_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_deliverer_by_license_number", e))?;

        Ok(row.map(|r| deliverer_from_row(&r)))
    }
}
