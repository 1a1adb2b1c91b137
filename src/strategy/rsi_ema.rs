use crate::error::{BacktestError, Result};
use crate::indicator::{Indicator, IndicatorParams, IndicatorRow};
use crate::strategy::Strategy;

//rsi with ema trend filter
//enters when rsi is above the oversold level and price trades above the trend ema
//exits when rsi turns overbought or price falls below the trend ema
//the trend ema period is set on the indicator set, not here
#[derive(Debug, Clone)]
pub struct RsiEmaStrategy {
    rsi_period: usize,
    oversold: f64,
    overbought: f64,
}

impl RsiEmaStrategy {
    pub fn new(rsi_period: usize, oversold: f64, overbought: f64) -> Self {
        RsiEmaStrategy {
            rsi_period,
            oversold,
            overbought,
        }
    }
}

impl Default for RsiEmaStrategy {
    fn default() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl Strategy for RsiEmaStrategy {
    fn name(&self) -> &'static str {
        "RSI-EMA Strategy"
    }

    //first bar with a defined rsi
    fn warmup(&self) -> usize {
        self.rsi_period
    }

    fn required_indicators(&self) -> &'static [Indicator] {
        &[Indicator::Rsi, Indicator::TrendEma]
    }

    fn check_params(&self, params: &IndicatorParams) -> Result<()> {
        if params.rsi_period != self.rsi_period {
            return Err(BacktestError::ParamsMismatch {
                strategy: self.name(),
                reason: format!(
                    "strategy uses RSI {}, set has {}",
                    self.rsi_period, params.rsi_period
                ),
            });
        }
        Ok(())
    }

    fn entry_condition(&self, _prev: &IndicatorRow, current: &IndicatorRow) -> bool {
        let (Some(rsi), Some(trend)) = (current.rsi, current.ema_trend) else {
            return false;
        };
        rsi > self.oversold && current.close > trend
    }

    fn exit_condition(&self, _prev: &IndicatorRow, current: &IndicatorRow) -> bool {
        let overbought = current.rsi.is_some_and(|rsi| rsi > self.overbought);
        let below_trend = current.ema_trend.is_some_and(|trend| current.close < trend);
        overbought || below_trend
    }
}
