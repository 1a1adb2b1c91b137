pub mod summary;
pub mod timeseries;

pub use summary::PerformanceSummary;
pub use timeseries::{cumulative_pnl_curve, max_drawdown, PnlPoint};
