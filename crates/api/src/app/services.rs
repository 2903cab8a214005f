use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use shelfwise_ai::{
    AdviceError, AdviceJob, AdviceScheduler, DiscountStrategyJob, ForecastResult,
    LocalAdviceScheduler, ReplenishmentForecastJob, StrategyResult,
};
use shelfwise_core::ProductId;
use shelfwise_infra::{
    AdvisorConfig, InMemoryInventoryStore, InMemorySalesHistoryStore, InventoryStore,
    SalesHistoryStore,
};
use shelfwise_inventory::{InventoryDocument, NewProduct};

use crate::app::errors::ApiError;

/// Shared state behind every handler.
pub struct AppServices {
    inventory: Arc<dyn InventoryStore>,
    sales: Arc<dyn SalesHistoryStore>,
    config: AdvisorConfig,
    scheduler: LocalAdviceScheduler,
    /// Process-wide worker slots: every running job holds one per pool
    /// thread, so concurrent requests never exceed `max_concurrent` threads.
    worker_slots: Arc<Semaphore>,
}

impl AppServices {
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        sales: Arc<dyn SalesHistoryStore>,
        config: AdvisorConfig,
    ) -> Self {
        let scheduler = LocalAdviceScheduler::new(config.worker_pool());
        let worker_slots = Arc::new(Semaphore::new(scheduler.pool().max_concurrent()));
        Self {
            inventory,
            sales,
            config,
            scheduler,
            worker_slots,
        }
    }

    /// Empty in-memory stores.
    pub fn in_memory(config: AdvisorConfig) -> Self {
        Self::new(
            Arc::new(InMemoryInventoryStore::new()),
            Arc::new(InMemorySalesHistoryStore::new()),
            config,
        )
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Ranked discount strategy over the whole inventory.
    pub async fn discount_strategy(&self) -> Result<Vec<StrategyResult>, ApiError> {
        let docs = self.inventory.list_all().await?;
        let reference = self.config.reference_date_or_today();
        let job = DiscountStrategyJob::from_documents(docs, reference)?;
        self.run_blocking(job).await
    }

    /// Replenishment forecast over the whole sales history.
    pub async fn replenishment_forecast(&self) -> Result<Vec<ForecastResult>, ApiError> {
        let docs = self.sales.list_all().await?;
        let job = ReplenishmentForecastJob::from_documents(docs, self.config.forecast_config())?;
        self.run_blocking(job).await
    }

    /// Validate and persist a new product, stamping `date_received` with now
    /// when the payload has none.
    pub async fn create_product(&self, doc: InventoryDocument) -> Result<ProductId, ApiError> {
        let product =
            NewProduct::from_document(doc).map_err(|e| ApiError::Validation(e.to_string()))?;
        let id = self.inventory.insert(product, Utc::now()).await?;
        info!(product_id = %id, "product registered");
        Ok(id)
    }

    /// Run a CPU-bound job on the blocking pool, bounded by the request
    /// timeout. Waiting for worker slots counts against the timeout. On
    /// timeout the partial work is discarded; the slots stay held until the
    /// job actually stops.
    async fn run_blocking<J>(&self, job: J) -> Result<J::Output, ApiError>
    where
        J: AdviceJob,
    {
        let scheduler = self.scheduler;
        let timeout = self.config.request_timeout;
        let name = job.name();
        let slots = Arc::clone(&self.worker_slots);
        let wanted = scheduler.pool().max_concurrent() as u32;

        let work = async move {
            let permit = match slots.acquire_many_owned(wanted).await {
                Ok(permit) => permit,
                Err(_) => return Err(AdviceError::Internal("worker slots closed".to_string())),
            };
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                scheduler.run(job)
            })
            .await
            .unwrap_or_else(|join| {
                Err(AdviceError::Internal(format!("{name} worker failed: {join}")))
            })
        };

        match tokio::time::timeout(timeout, work).await {
            Ok(out) => Ok(out?),
            Err(_) => {
                let timeout_ms = timeout.as_millis() as u64;
                warn!(job = name, timeout_ms, "advice job timed out");
                Err(ApiError::Timeout(timeout))
            }
        }
    }
}

/// Wire the stores named by `config`: Postgres when built with the
/// `postgres` feature and `DATABASE_URL` is set, in-memory otherwise.
pub async fn build_services(config: AdvisorConfig) -> anyhow::Result<AppServices> {
    #[cfg(feature = "postgres")]
    if let Some(url) = config.database_url.clone() {
        use anyhow::Context;
        use shelfwise_infra::store::{
            PostgresInventoryStore, PostgresSalesHistoryStore, postgres::ensure_schema,
        };

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_concurrent as u32 + 1)
            .connect(&url)
            .await
            .context("failed to connect to DATABASE_URL")?;
        ensure_schema(&pool).await?;
        info!("using postgres stores");

        return Ok(AppServices::new(
            Arc::new(PostgresInventoryStore::new(pool.clone())),
            Arc::new(PostgresSalesHistoryStore::new(pool)),
            config,
        ));
    }

    if config.database_url.is_some() {
        warn!("DATABASE_URL is set but postgres support is not compiled in");
    }
    info!("using in-memory stores");
    Ok(AppServices::in_memory(config))
}
