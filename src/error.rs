use chrono::{DateTime, Utc};
use thiserror::Error;

//broad category of a backtest failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    //malformed price series or bar data
    Input,
    //invalid indicator parameters or strategy selection
    Config,
    //series too short for an indicator's warm-up window
    Indicator,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("timestamp at index {index} ({current}) is earlier than the previous bar ({previous})")]
    NonMonotonicTimestamp {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    #[error("duplicate timestamp {timestamp} at index {index}")]
    DuplicateTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    #[error("invalid bar at {timestamp}: {reason}")]
    InvalidBar {
        timestamp: DateTime<Utc>,
        reason: String,
    },

    #[error("indicator set has {indicators} rows but price series has {bars} bars")]
    MisalignedIndicators { indicators: usize, bars: usize },

    #[error("non-finite input to {indicator} at index {index}")]
    NonFiniteValue { indicator: &'static str, index: usize },

    #[error("invalid {indicator} period {period}: must be at least 1")]
    InvalidPeriod { indicator: &'static str, period: usize },

    #[error("{indicator} period {period} exceeds series length {len}")]
    PeriodExceedsSeries {
        indicator: &'static str,
        period: usize,
        len: usize,
    },

    #[error("MACD fast period ({fast}) must be less than slow period ({slow})")]
    FastNotBelowSlow { fast: usize, slow: usize },

    #[error("invalid RSI thresholds: oversold ({oversold}) must be below overbought ({overbought}), both within [0, 100]")]
    InvalidThresholds { oversold: f64, overbought: f64 },

    #[error("invalid position size {0}: must be positive and finite")]
    InvalidPositionSize(f64),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("{strategy} needs {indicator}, which the indicator set was not computed with")]
    MissingIndicator {
        strategy: &'static str,
        indicator: &'static str,
    },

    #[error("{strategy} parameters do not match the indicator set: {reason}")]
    ParamsMismatch {
        strategy: &'static str,
        reason: String,
    },

    #[error("insufficient data for {indicator}: have {bars} bars, need more than {required}")]
    InsufficientData {
        indicator: &'static str,
        bars: usize,
        required: usize,
    },
}

impl BacktestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BacktestError::EmptySeries
            | BacktestError::NonMonotonicTimestamp { .. }
            | BacktestError::DuplicateTimestamp { .. }
            | BacktestError::InvalidBar { .. }
            | BacktestError::MisalignedIndicators { .. }
            | BacktestError::NonFiniteValue { .. } => ErrorKind::Input,
            BacktestError::InvalidPeriod { .. }
            | BacktestError::PeriodExceedsSeries { .. }
            | BacktestError::FastNotBelowSlow { .. }
            | BacktestError::InvalidThresholds { .. }
            | BacktestError::InvalidPositionSize(_)
            | BacktestError::UnknownStrategy(_)
            | BacktestError::MissingIndicator { .. }
            | BacktestError::ParamsMismatch { .. } => ErrorKind::Config,
            BacktestError::InsufficientData { .. } => ErrorKind::Indicator,
        }
    }
}

pub type Result<T> = std::result::Result<T, BacktestError>;
