pub mod backtest;
pub mod simulator;

pub use backtest::{BacktestResult, Backtester};
pub use simulator::{EndOfDataPolicy, SignalOutcome, TradeSimulator};
