//! Assemble a [`BarberShop`] from configuration plus optional collaborators.

use std::sync::Arc;

use crate::config::ShopConfig;
use crate::core::{BarberShop, EventSink, ServiceExecutor, ShopError};
use crate::infra::{SimulatedService, TracingEventSink};

/// Builder for [`BarberShop`].
///
/// Without overrides the shop sleeps through [`SimulatedService`] at the
/// configured time unit and narrates through [`TracingEventSink`].
#[derive(Default)]
pub struct BarberShopBuilder {
    config: ShopConfig,
    executor: Option<Arc<dyn ServiceExecutor>>,
    sink: Option<Arc<dyn EventSink>>,
}

impl BarberShopBuilder {
    /// Start from a configuration.
    #[must_use]
    pub fn new(config: ShopConfig) -> Self {
        Self {
            config,
            executor: None,
            sink: None,
        }
    }

    /// Use a custom service executor.
    #[must_use]
    pub fn with_executor(mut self, executor: impl ServiceExecutor) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Use an already shared service executor.
    #[must_use]
    pub fn with_shared_executor(mut self, executor: Arc<dyn ServiceExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Use a custom event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Validate the configuration and build the shop.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::InvalidConfig`] if the configuration is invalid.
    pub fn build(self) -> Result<BarberShop, ShopError> {
        self.config.validate().map_err(ShopError::InvalidConfig)?;
        let unit_ms = self.config.service_time_unit_ms;
        let executor = self.executor.unwrap_or_else(|| {
            Arc::new(SimulatedService::new(unit_ms)) as Arc<dyn ServiceExecutor>
        });
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingEventSink) as Arc<dyn EventSink>);
        BarberShop::new(self.config, executor, sink)
    }
}

impl std::fmt::Debug for BarberShopBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarberShopBuilder")
            .field("config", &self.config)
            .field("custom_executor", &self.executor.is_some())
            .field("custom_sink", &self.sink.is_some())
            .finish()
    }
}
