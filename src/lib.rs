pub mod charts;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod views;

pub use cleaner::Cleaner;
pub use config::DashboardConfig;
pub use error::CleanError;
pub use filter::OrderFilter;
pub use pipeline::Dashboard;
pub use record::{Festival, Order, RawOrder, Traffic, Weather};
pub use views::{View, ViewKind};
