//! Metrics collection for observability
//!
//! Prometheus metrics for monitoring the registry engine.
//!
//! # Metrics
//!
//! - `registry_properties_total` - Properties created
//! - `registry_investments_total` - Accepted investments
//! - `registry_income_events_total` - Rental income records
//! - `registry_distributions_total` - Distribution rounds opened
//! - `registry_claims_total` - Dividends claimed
//! - `registry_pending_pool_units` - Sum of pending distribution pools

use prometheus::{IntCounter, IntGauge, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Properties created
    pub properties_total: IntCounter,

    /// Accepted investments
    pub investments_total: IntCounter,

    /// Rental income records
    pub income_events_total: IntCounter,

    /// Distribution rounds opened
    pub distributions_total: IntCounter,

    /// Dividends claimed
    pub claims_total: IntCounter,

    /// Sum of pending distribution pools (smallest currency units)
    pub pending_pool_units: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let properties_total = IntCounter::with_opts(Opts::new(
            "registry_properties_total",
            "Properties created",
        ))?;
        registry.register(Box::new(properties_total.clone()))?;

        let investments_total = IntCounter::with_opts(Opts::new(
            "registry_investments_total",
            "Accepted investments",
        ))?;
        registry.register(Box::new(investments_total.clone()))?;

        let income_events_total = IntCounter::with_opts(Opts::new(
            "registry_income_events_total",
            "Rental income records",
        ))?;
        registry.register(Box::new(income_events_total.clone()))?;

        let distributions_total = IntCounter::with_opts(Opts::new(
            "registry_distributions_total",
            "Distribution rounds opened",
        ))?;
        registry.register(Box::new(distributions_total.clone()))?;

        let claims_total = IntCounter::with_opts(Opts::new(
            "registry_claims_total",
            "Dividends claimed",
        ))?;
        registry.register(Box::new(claims_total.clone()))?;

        let pending_pool_units = IntGauge::with_opts(Opts::new(
            "registry_pending_pool_units",
            "Sum of pending distribution pools",
        ))?;
        registry.register(Box::new(pending_pool_units.clone()))?;

        Ok(Self {
            properties_total,
            investments_total,
            income_events_total,
            distributions_total,
            claims_total,
            pending_pool_units,
            registry,
        })
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}
