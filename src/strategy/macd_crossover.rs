use crate::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::error::{BacktestError, Result};
use crate::indicator::{Indicator, IndicatorParams, IndicatorRow};
use crate::strategy::{Crossing, Strategy};

//macd crossover strategy
//goes long when the macd line crosses above its signal line
//exits when the macd line crosses below its signal line
#[derive(Debug, Clone)]
pub struct MacdStrategy {
    fast: usize,
    slow: usize,
    signal_period: usize,
}

impl MacdStrategy {
    pub fn new(fast: usize, slow: usize, signal_period: usize) -> Self {
        MacdStrategy {
            fast,
            slow,
            signal_period,
        }
    }

    fn crossing(prev: &IndicatorRow, current: &IndicatorRow) -> Option<Crossing> {
        let (Some(prev_line), Some(prev_signal), Some(line), Some(signal)) = (
            prev.macd_line,
            prev.macd_signal,
            current.macd_line,
            current.macd_signal,
        ) else {
            return None;
        };
        Crossing::detect(prev_line, prev_signal, line, signal)
    }
}

impl Default for MacdStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
    }
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &'static str {
        "MACD Strategy"
    }

    //both the slow ema and the signal line need their windows before crossings count
    fn warmup(&self) -> usize {
        self.slow.max(self.signal_period)
    }

    fn required_indicators(&self) -> &'static [Indicator] {
        &[Indicator::Macd]
    }

    fn check_params(&self, params: &IndicatorParams) -> Result<()> {
        let expected = (self.fast, self.slow, self.signal_period);
        let actual = (params.ema_fast, params.ema_slow, params.macd_signal);
        if expected != actual {
            return Err(BacktestError::ParamsMismatch {
                strategy: self.name(),
                reason: format!(
                    "strategy uses MACD {}/{}/{}, set has {}/{}/{}",
                    expected.0, expected.1, expected.2, actual.0, actual.1, actual.2
                ),
            });
        }
        Ok(())
    }

    fn entry_condition(&self, prev: &IndicatorRow, current: &IndicatorRow) -> bool {
        Self::crossing(prev, current) == Some(Crossing::Above)
    }

    fn exit_condition(&self, prev: &IndicatorRow, current: &IndicatorRow) -> bool {
        Self::crossing(prev, current) == Some(Crossing::Below)
    }
}
