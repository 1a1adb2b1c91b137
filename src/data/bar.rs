use crate::error::{BacktestError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//represents a single ohlcv bar (candlestick) of market data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    //creates a new bar with validation
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self> {
        let bar = PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    //flat bar where every price equals close
    pub fn from_close(timestamp: DateTime<Utc>, close: f64) -> Self {
        PriceBar {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    //checks prices are finite and positive, volume is non-negative and
    //open/close sit inside the high-low range
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| BacktestError::InvalidBar {
            timestamp: self.timestamp,
            reason,
        };
        let (open, high, low, close) = (self.open, self.high, self.low, self.close);

        for (field, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{} price {} must be positive", field, value)));
            }
        }

        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(invalid(format!("negative volume {}", self.volume)));
        }

        if high < low {
            return Err(invalid(format!("high ({}) < low ({})", high, low)));
        }

        if close < low || close > high {
            return Err(invalid(format!(
                "close ({}) outside high-low range [{}, {}]",
                close, low, high
            )));
        }

        if open < low || open > high {
            return Err(invalid(format!(
                "open ({}) outside high-low range [{}, {}]",
                open, low, high
            )));
        }

        Ok(())
    }
}
