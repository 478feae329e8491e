use std::sync::Arc;

use anyhow::Result;
use motorent_core::RentalPlanCatalog;
use motorent_server::config::MotorentConfig;
use motorent_server::domain::{DelivererService, MotorcycleService, RentalService, Services};
use motorent_server::media::InMemoryObjectStorage;
use motorent_server::mq::{registration_consumer_loop, ChannelEventPublisher, EventPublisher};
use motorent_server::storage::{
    SqlDelivererRepository, SqlMotorcycleRepository, SqlRegisteredMotorcycleRepository,
    SqlRentalRepository,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};

/// Composition root: owns the database pool and wires the lifecycle
/// services, the event channel and its consumer.
pub struct MotorentServer {
    config: MotorentConfig,
    pool: PgPool,
}

impl MotorentServer {
    pub async fn new(config: MotorentConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

        Ok(Self { config, pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        match sqlx::migrate!("./migrations").run(&self.pool).await {
            Ok(_) => {
                info!("Database migrations completed successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to run database migrations: {}", e);
                Err(anyhow::anyhow!("Migration failed: {}", e))
            }
        }
    }

    /// Runs the registration consumer until the shutdown signal fires,
    /// then drains it and closes the pool.
    pub async fn serve(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let (publisher, receiver) =
            ChannelEventPublisher::channel(self.config.event_channel_capacity);

        let registrations = Arc::new(SqlRegisteredMotorcycleRepository::new(self.pool.clone()));
        let consumer_handle = tokio::spawn(registration_consumer_loop(receiver, registrations));

        let services = self.build_services(Arc::new(publisher));
        info!("Motorent services ready, waiting for shutdown signal");

        shutdown_signal.await;

        // Dropping the services drops the last publisher handle, which
        // closes the channel; the consumer drains what is left and
        // exits on its own.
        drop(services);
        if let Err(e) = consumer_handle.await {
            error!("Registration consumer task failed: {}", e);
        }

        self.shutdown().await
    }

    /// Lifecycle services wired against the SQL backend. The transport
    /// layer on top of these is deliberately not part of this crate.
    pub fn build_services(&self, event_publisher: Arc<dyn EventPublisher>) -> Services {
        let actor = self.config.audit_actor.clone();

        let motorcycle_repository = Arc::new(SqlMotorcycleRepository::new(
            self.pool.clone(),
            actor.clone(),
        ));
        let deliverer_repository = Arc::new(SqlDelivererRepository::new(
            self.pool.clone(),
            actor.clone(),
        ));
        let rental_repository = Arc::new(SqlRentalRepository::new(self.pool.clone(), actor));

        let catalog = Arc::new(RentalPlanCatalog::standard());
        let object_storage = Arc::new(InMemoryObjectStorage::new());

        Services {
            motorcycles: MotorcycleService::new(
                motorcycle_repository.clone(),
                rental_repository.clone(),
                event_publisher,
            ),
            deliverers: DelivererService::new(deliverer_repository.clone(), object_storage),
            rentals: RentalService::new(
                rental_repository,
                motorcycle_repository,
                deliverer_repository,
                catalog,
            ),
        }
    }

    async fn shutdown(self) -> Result<()> {
        info!("Shutting down Motorent server");

        self.pool.close().await;
        info!("Closed database connections");

        info!("Motorent server shutdown complete");
        Ok(())
    }
}
