pub mod trade;

pub use trade::{ExitReason, Trade, TradeStatus};
