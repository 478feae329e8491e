#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};
use motorent_core::commands::{
    CreateDelivererCommand, CreateMotorcycleCommand, CreateRentalCommand,
};
use motorent_core::{
    Deliverer, DelivererId, Motorcycle, MotorcycleId, Rental, RentalPlanCatalog,
    REGISTRATION_YEAR,
};
use motorent_server::domain::{
    DelivererService, MotorcycleService, RentalService, Services,
};
use motorent_server::media::InMemoryObjectStorage;
use motorent_server::mq::{registration_consumer_loop, ChannelEventPublisher, EventPublisher};
use motorent_server::storage::{
    DelivererRepository, InMemoryStore, MotorcycleRepository, RentalRepository,
};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration as StdDuration;

/// PNG signature bytes, base64 encoded.
pub const PNG_PAYLOAD: &str = "iVBORw0KGgo=";
/// BMP header bytes, base64 encoded.
pub const BMP_PAYLOAD: &str = "Qk02AAAAAAAAADYAAAA=";

/// Fully wired service set over an in-memory backend, with the
/// registration consumer running against the same store.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub object_storage: Arc<InMemoryObjectStorage>,
    pub services: Services,
    consumer_handle: tokio::task::JoinHandle<()>,
}

impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let object_storage = Arc::new(InMemoryObjectStorage::new());
        let (publisher, receiver) = ChannelEventPublisher::channel(16);
        let consumer_handle = tokio::spawn(registration_consumer_loop(receiver, store.clone()));

        let publisher: Arc<dyn EventPublisher> = Arc::new(publisher);
        let catalog = Arc::new(RentalPlanCatalog::standard());
        let services = Services {
            motorcycles: MotorcycleService::new(store.clone(), store.clone(), publisher),
            deliverers: DelivererService::new(store.clone(), object_storage.clone()),
            rentals: RentalService::new(store.clone(), store.clone(), store.clone(), catalog),
        };

        TestContext {
            store,
            object_storage,
            services,
            consumer_handle,
        }
    }

    /// Looks up a live motorcycle through the repository, bypassing the
    /// service envelope.
    pub async fn motorcycle_by_plate(&self, plate_number: &str) -> Motorcycle {
        MotorcycleRepository::find_by_plate(self.store.as_ref(), plate_number, false)
            .await
            .expect("Failed to query motorcycle")
            .expect("Motorcycle should exist")
    }

    pub async fn deliverer_by_tax_id(&self, business_tax_id: &str) -> Deliverer {
        self.store
            .find_by_business_tax_id(business_tax_id)
            .await
            .expect("Failed to query deliverer")
            .expect("Deliverer should exist")
    }

    pub async fn single_rental_for(&self, motorcycle_id: &MotorcycleId) -> Rental {
        let mut rentals = self
            .store
            .find_by_motorcycle_id(motorcycle_id)
            .await
            .expect("Failed to query rentals");
        assert_eq!(rentals.len(), 1, "Expected exactly one rental");
        rentals.remove(0)
    }

    /// Drops the services, which closes the event channel, and waits for
    /// the consumer to drain.
    pub async fn cleanup(self) {
        drop(self.services);
        let _ = tokio::time::timeout(StdDuration::from_secs(5), self.consumer_handle).await;
    }
}

pub fn random_plate() -> String {
    let mut rng = rand::thread_rng();
    let letters: String = (0..3).map(|_| rng.gen_range(b'A'..=b'Z') as char).collect();
    format!("{}-{:04}", letters, rng.gen_range(0..10_000))
}

pub fn random_digits(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| rng.gen_range(b'0'..=b'9') as char).collect()
}

/// A 2023 motorcycle; creation stores it without publishing an event.
pub fn motorcycle_command(plate_number: &str) -> CreateMotorcycleCommand {
    CreateMotorcycleCommand {
        identifier: format!("MOTO-{}", plate_number),
        year: 2023,
        model: "Sport 300".to_string(),
        plate_number: plate_number.to_string(),
    }
}

/// A motorcycle from the registration year; creation publishes an event.
pub fn registration_year_command(plate_number: &str) -> CreateMotorcycleCommand {
    CreateMotorcycleCommand {
        year: REGISTRATION_YEAR,
        ..motorcycle_command(plate_number)
    }
}

pub fn deliverer_command(
    business_tax_id: &str,
    driver_license_number: &str,
) -> CreateDelivererCommand {
    CreateDelivererCommand {
        identifier: format!("DELIV-{}", driver_license_number),
        name: "John Doe".to_string(),
        business_tax_id: business_tax_id.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
        driver_license_number: driver_license_number.to_string(),
        driver_license_type: 1,
        driver_license_image_base64: None,
    }
}

/// A rental starting today; the stored start date lands on tomorrow.
pub fn rental_command(
    deliverer_id: DelivererId,
    motorcycle_id: MotorcycleId,
    plan_days: i32,
) -> CreateRentalCommand {
    let today = Utc::now().date_naive();
    CreateRentalCommand {
        plan_days,
        deliverer_id,
        motorcycle_id,
        start_date: today,
        estimating_ending_date: today + Duration::days(plan_days as i64),
    }
}
