//an indicator-driven backtesting engine for OHLCV candle data

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod ledger;
pub mod metrics;
pub mod report;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{BacktestConfiguration, StrategyKind};
    pub use crate::data::{load_csv, PriceBar, PriceSeries};
    pub use crate::engine::{
        BacktestResult, Backtester, EndOfDataPolicy, SignalOutcome, TradeSimulator,
    };
    pub use crate::error::{BacktestError, ErrorKind};
    pub use crate::indicator::{
        compute_ema, compute_macd, compute_rsi, Indicator, IndicatorParams, IndicatorRow, IndicatorSet,
        MacdSeries,
    };
    pub use crate::ledger::{ExitReason, Trade, TradeStatus};
    pub use crate::metrics::{cumulative_pnl_curve, PerformanceSummary, PnlPoint};
    pub use crate::report::{write_summaries_csv, write_trades_csv};
    pub use crate::strategy::{
        Crossing, MacdStrategy, RsiEmaStrategy, Signal, SignalKind, SignalState, Strategy,
    };
}
