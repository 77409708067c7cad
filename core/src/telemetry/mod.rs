pub mod log;
pub mod metrics;

pub use log::TickLogger;
pub use metrics::TickMetrics;
