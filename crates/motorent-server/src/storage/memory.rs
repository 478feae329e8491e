use async_trait::async_trait;
use motorent_core::{
    Deliverer, DelivererId, Motorcycle, MotorcycleId, PagedResult, RegisteredMotorcycle, Rental,
    RentalId, RentalWithRelated, Trackable,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{MotorentError, Result};
use crate::storage::{
    stamped_for_insert, stamped_for_update, DelivererRepository, MotorcycleRepository,
    RegisteredMotorcycleRepository, RentalRepository,
};

/// Whole storage backend in process memory. Implements every
/// repository trait with the same contracts as the SQL backend,
/// including the unique-index rejections, so services and tests run
/// against it unchanged.
pub struct InMemoryStore {
    motorcycles: RwLock<HashMap<MotorcycleId, Motorcycle>>,
    deliverers: RwLock<HashMap<DelivererId, Deliverer>>,
    rentals: RwLock<HashMap<RentalId, Rental>>,
    registrations: RwLock<Vec<RegisteredMotorcycle>>,
    audit_actor: String,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_actor("admin")
    }

    pub fn with_actor(audit_actor: &str) -> Self {
        Self {
            motorcycles: RwLock::new(HashMap::new()),
            deliverers: RwLock::new(HashMap::new()),
            rentals: RwLock::new(HashMap::new()),
            registrations: RwLock::new(Vec::new()),
            audit_actor: audit_actor.to_string(),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MotorcycleRepository for InMemoryStore {
    async fn add(&self, motorcycle: &Motorcycle) -> Result<()> {
        let mut motorcycles = self.motorcycles.write().await;

        // The plate index is partial: only live rows participate.
        let plate_taken = motorcycles
            .values()
            .any(|m| !m.stamps.is_deleted && m.plate_number == motorcycle.plate_number);
        if plate_taken {
            return Err(MotorentError::Duplicate {
                constraint: "ux_motorcycles_plate_number".to_string(),
            });
        }

        let record = stamped_for_insert(motorcycle, &self.audit_actor);
        motorcycles.insert(record.id, record);
        Ok(())
    }

    async fn update(&self, motorcycle: &Motorcycle) -> Result<()> {
        let mut motorcycles = self.motorcycles.write().await;

        let live = motorcycles
            .get(&motorcycle.id)
            .is_some_and(|m| !m.stamps.is_deleted);
        if !live {
            return Err(MotorentError::MotorcycleNotFound {
                id: motorcycle.id.to_string(),
            });
        }

        let plate_taken = motorcycles.values().any(|m| {
            m.id != motorcycle.id && !m.stamps.is_deleted && m.plate_number == motorcycle.plate_number
        });
        if plate_taken {
            return Err(MotorentError::Duplicate {
                constraint: "ux_motorcycles_plate_number".to_string(),
            });
        }

        let record = stamped_for_update(motorcycle, &self.audit_actor);
        motorcycles.insert(record.id, record);
        Ok(())
    }

    async fn delete(&self, id: &MotorcycleId) -> Result<()> {
        let mut motorcycles = self.motorcycles.write().await;

        match motorcycles.get_mut(id) {
            Some(motorcycle) if !motorcycle.stamps.is_deleted => {
                motorcycle.mark_deleted(&self.audit_actor);
                Ok(())
            }
            _ => Err(MotorentError::MotorcycleNotFound { id: id.to_string() }),
        }
    }

    async fn find_by_id(&self, id: &MotorcycleId) -> Result<Option<Motorcycle>> {
        let motorcycles = self.motorcycles.read().await;
        Ok(motorcycles
            .get(id)
            .filter(|m| !m.stamps.is_deleted)
            .cloned())
    }

    async fn find_by_plate(&self, plate_number: &str, deleted: bool) -> Result<Option<Motorcycle>> {
        let motorcycles = self.motorcycles.read().await;
        Ok(motorcycles
            .values()
            .find(|m| m.plate_number == plate_number && m.stamps.is_deleted == deleted)
            .cloned())
    }

    async fn list_page(&self, page_number: i32, page_size: i32) -> Result<PagedResult<Motorcycle>> {
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);

        let motorcycles = self.motorcycles.read().await;
        let mut items: Vec<Motorcycle> = motorcycles
            .values()
            .filter(|m| !m.stamps.is_deleted)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.stamps
                .created_at
                .cmp(&b.stamps.created_at)
                .then_with(|| a.id.as_uuid().cmp(&b.id.as_uuid()))
        });

        let total_count = items.len() as i64;
        let start = (page_number as usize - 1) * page_size as usize;
        let page_items = items
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();

        Ok(PagedResult::new(
            page_items,
            total_count,
            page_size,
            page_number,
        ))
    }
}

#[async_trait]
impl DelivererRepository for InMemoryStore {
    async fn add(&self, deliverer: &Deliverer) -> Result<()> {
        let mut deliverers = self.deliverers.write().await;

        // Both document indexes cover every row, deleted ones included.
        if deliverers
            .values()
            .any(|d| d.business_tax_id == deliverer.business_tax_id)
        {
            return Err(MotorentError::Duplicate {
                constraint: "ux_deliverers_business_tax_id".to_string(),
            });
        }
        if deliverers
            .values()
            .any(|d| d.driver_license_number == deliverer.driver_license_number)
        {
            return Err(MotorentError::Duplicate {
                constraint: "ux_deliverers_driver_license_number".to_string(),
            });
        }

        let record = stamped_for_insert(deliverer, &self.audit_actor);
        deliverers.insert(record.id, record);
        Ok(())
    }

    async fn update(&self, deliverer: &Deliverer) -> Result<()> {
        let mut deliverers = self.deliverers.write().await;

        let live = deliverers
            .get(&deliverer.id)
            .is_some_and(|d| !d.stamps.is_deleted);
        if !live {
            return Err(MotorentError::DelivererNotFound {
                id: deliverer.id.to_string(),
            });
        }

        if deliverers
            .values()
            .any(|d| d.id != deliverer.id && d.business_tax_id == deliverer.business_tax_id)
        {
            return Err(MotorentError::Duplicate {
                constraint: "ux_deliverers_business_tax_id".to_string(),
            });
        }
        if deliverers.values().any(|d| {
            d.id != deliverer.id && d.driver_license_number == deliverer.driver_license_number
        }) {
            return Err(MotorentError::Duplicate {
                constraint: "ux_deliverers_driver_license_number".to_string(),
            });
        }

        let record = stamped_for_update(deliverer, &self.audit_actor);
        deliverers.insert(record.id, record);
        Ok(())
    }

    async fn find_by_id(&self, id: &DelivererId) -> Result<Option<Deliverer>> {
        let deliverers = self.deliverers.read().await;
        Ok(deliverers.get(id).filter(|d| !d.stamps.is_deleted).cloned())
    }

    async fn find_by_business_tax_id(&self, business_tax_id: &str) -> Result<Option<Deliverer>> {
        let deliverers = self.deliverers.read().await;
        Ok(deliverers
            .values()
            .find(|d| !d.stamps.is_deleted && d.business_tax_id == business_tax_id)
            .cloned())
    }

    async fn find_by_driver_license_number(
        &self,
        driver_license_number: &str,
    ) -> Result<Option<Deliverer>> {
        let deliverers = self.deliverers.read().await;
        Ok(deliverers
            .values()
            .find(|d| !d.stamps.is_deleted && d.driver_license_number == driver_license_number)
            .cloned())
    }
}

#[async_trait]
impl RentalRepository for InMemoryStore {
    async fn add(&self, rental: &Rental) -> Result<()> {
        let mut rentals = self.rentals.write().await;
        let record = stamped_for_insert(rental, &self.audit_actor);
        rentals.insert(record.id, record);
        Ok(())
    }

    async fn update(&self, rental: &Rental) -> Result<()> {
        let mut rentals = self.rentals.write().await;

        let live = rentals
            .get(&rental.id)
            .is_some_and(|r| !r.stamps.is_deleted);
        if !live {
            return Err(MotorentError::RentalNotFound {
                id: rental.id.to_string(),
            });
        }

        let record = stamped_for_update(rental, &self.audit_actor);
        rentals.insert(record.id, record);
        Ok(())
    }

    async fn find_by_id(&self, id: &RentalId) -> Result<Option<Rental>> {
        let rentals = self.rentals.read().await;
        Ok(rentals.get(id).filter(|r| !r.stamps.is_deleted).cloned())
    }

    async fn find_by_id_with_related(&self, id: &RentalId) -> Result<Option<RentalWithRelated>> {
        let Some(rental) = RentalRepository::find_by_id(self, id).await? else {
            return Ok(None);
        };

        // Related rows resolve regardless of their deletion flag.
        let motorcycle = self
            .motorcycles
            .read()
            .await
            .get(&rental.motorcycle_id)
            .cloned();
        let deliverer = self
            .deliverers
            .read()
            .await
            .get(&rental.deliverer_id)
            .cloned();

        match (motorcycle, deliverer) {
            (Some(motorcycle), Some(deliverer)) => Ok(Some(RentalWithRelated {
                rental,
                motorcycle,
                deliverer,
            })),
            _ => Ok(None),
        }
    }

    async fn find_by_motorcycle_id(&self, motorcycle_id: &MotorcycleId) -> Result<Vec<Rental>> {
        let rentals = self.rentals.read().await;
        let mut matches: Vec<Rental> = rentals
            .values()
            .filter(|r| !r.stamps.is_deleted && r.motorcycle_id == *motorcycle_id)
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.stamps.created_at);
        Ok(matches)
    }

    async fn find_by_deliverer_id(&self, deliverer_id: &DelivererId) -> Result<Vec<Rental>> {
        let rentals = self.rentals.read().await;
        let mut matches: Vec<Rental> = rentals
            .values()
            .filter(|r| !r.stamps.is_deleted && r.deliverer_id == *deliverer_id)
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.stamps.created_at);
        Ok(matches)
    }
}

#[async_trait]
impl RegisteredMotorcycleRepository for InMemoryStore {
    async fn add(&self, registration: &RegisteredMotorcycle) -> Result<()> {
        let mut registrations = self.registrations.write().await;
        registrations.push(registration.clone());
        Ok(())
    }

    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<RegisteredMotorcycle>> {
        let registrations = self.registrations.read().await;
        Ok(registrations
            .iter()
            .find(|r| r.plate_number == plate_number)
            .cloned())
    }
}
