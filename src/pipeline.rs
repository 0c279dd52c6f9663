//! Pipeline orchestration: load → clean → filter → view.

use anyhow::{Context, Result};
use tracing::info;

use crate::cleaner::{CleanReport, Cleaner};
use crate::config::DashboardConfig;
use crate::error::CleanError;
use crate::filter::OrderFilter;
use crate::record::{Order, RawOrder};
use crate::source::load_raw_orders;
use crate::views::{View, ViewKind};

/// A cleaned dataset ready to render any page under any filter.
pub struct Dashboard {
    orders: Vec<Order>,
    report: CleanReport,
    config: DashboardConfig,
}

impl Dashboard {
    /// Loads `source` and cleans it with the configured rules.
    #[tracing::instrument(skip(config))]
    pub fn load(source: &str, config: DashboardConfig) -> Result<Self> {
        let rows = load_raw_orders(source)?;
        Self::from_raw(&rows, config)
            .with_context(|| format!("Failed to clean dataset: {source}"))
    }

    pub fn from_raw(rows: &[RawOrder], config: DashboardConfig) -> Result<Self, CleanError> {
        let (orders, report) = Cleaner::new(config.cleaning.clone()).clean_with_report(rows)?;
        Ok(Self {
            orders,
            report,
            config,
        })
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn report(&self) -> &CleanReport {
        &self.report
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Builds one page over the orders accepted by `filter`.
    pub fn render(&self, kind: ViewKind, filter: &OrderFilter) -> View {
        let filtered = filter.apply(&self.orders);
        info!(
            view = ?kind,
            cleaned = self.orders.len(),
            filtered = filtered.len(),
            "Rendering view"
        );
        View::build(kind, &filtered, &self.config.limits)
    }
}
