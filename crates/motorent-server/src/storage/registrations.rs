use async_trait::async_trait;
use motorent_core::RegisteredMotorcycle;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::Result;
use crate::storage::{map_read_error, map_write_error};

/// Read model fed by the registration consumer. Append-only; rows keep
/// the announced snapshot, not the live fleet record.
#[async_trait]
pub trait RegisteredMotorcycleRepository: Send + Sync {
    async fn add(&self, registration: &RegisteredMotorcycle) -> Result<()>;
    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<RegisteredMotorcycle>>;
}

pub struct SqlRegisteredMotorcycleRepository {
    pool: PgPool,
}

impl SqlRegisteredMotorcycleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn registration_from_row(r: &PgRow) -> RegisteredMotorcycle {
    RegisteredMotorcycle {
        identifier: r.get("identifier"),
        year: r.get("year"),
        model: r.get("model"),
        plate_number: r.get("plate_number"),
    }
}

#[async_trait]
impl RegisteredMotorcycleRepository for SqlRegisteredMotorcycleRepository {
    async fn add(&self, registration: &RegisteredMotorcycle) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO motorent.registered_motorcycles
            (identifier, year, model, plate_number)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&registration.identifier)
        .bind(registration.year)
        .bind(&registration.model)
        .bind(&registration.plate_number)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error("add_registered_motorcycle", e))?;

        Ok(())
    }

    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<RegisteredMotorcycle>> {
        let row = sqlx::query(
            r#"
            SELECT identifier, year, model, plate_number
            FROM motorent.registered_motorcycles
            WHERE plate_number = $1
            LIMIT 1
            "#,
        )
        .bind(plate_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_read_error("find_registered_motorcycle", e))?;

        Ok(row.map(|r| registration_from_row(&r)))
    }
}
