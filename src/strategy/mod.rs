pub mod macd_crossover;
pub mod rsi_ema;
pub mod signal;

pub use macd_crossover::MacdStrategy;
pub use rsi_ema::RsiEmaStrategy;
pub use signal::{Signal, SignalKind};

use crate::data::PriceSeries;
use crate::error::{BacktestError, Result};
use crate::indicator::{Indicator, IndicatorParams, IndicatorRow, IndicatorSet};

//position state tracked while generating signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    NoPosition,
    InPosition,
}

//strategy interface that all strategies must implement
//implementors describe their conditions, the shared state machine in
//`generate_signals` keeps entries and exits strictly alternating
pub trait Strategy: Send + Sync {
    //returns the strategy name
    fn name(&self) -> &'static str;

    //first bar index at which a decision can be made (always >= 1)
    fn warmup(&self) -> usize;

    //indicator columns the conditions read
    fn required_indicators(&self) -> &'static [Indicator];

    //rejects an indicator set computed with periods other than the strategy's own
    fn check_params(&self, _params: &IndicatorParams) -> Result<()> {
        Ok(())
    }

    //true when a flat strategy should enter on `current`
    fn entry_condition(&self, prev: &IndicatorRow, current: &IndicatorRow) -> bool;

    //true when an open position should be exited on `current`
    fn exit_condition(&self, prev: &IndicatorRow, current: &IndicatorRow) -> bool;

    //single pass over the series, at most one signal per bar
    fn generate_signals(
        &self,
        series: &PriceSeries,
        indicators: &IndicatorSet,
    ) -> Result<Vec<Signal>> {
        if indicators.len() != series.len() {
            return Err(BacktestError::MisalignedIndicators {
                indicators: indicators.len(),
                bars: series.len(),
            });
        }

        for &indicator in self.required_indicators() {
            if !indicators.has(indicator) {
                return Err(BacktestError::MissingIndicator {
                    strategy: self.name(),
                    indicator: indicator.name(),
                });
            }
        }
        if let Some(params) = indicators.params() {
            self.check_params(params)?;
        }

        let start = self.warmup().max(1);
        if series.len() <= start {
            return Err(BacktestError::InsufficientData {
                indicator: self.name(),
                bars: series.len(),
                required: start,
            });
        }

        let rows = indicators.rows();
        let mut state = SignalState::NoPosition;
        let mut signals = Vec::new();

        for i in start..series.len() {
            let (prev, current) = (&rows[i - 1], &rows[i]);
            let bar = &series[i];

            match state {
                SignalState::NoPosition if self.entry_condition(prev, current) => {
                    signals.push(Signal::entry(bar.timestamp, bar.close));
                    state = SignalState::InPosition;
                }
                SignalState::InPosition if self.exit_condition(prev, current) => {
                    signals.push(Signal::exit(bar.timestamp, bar.close));
                    state = SignalState::NoPosition;
                }
                _ => {}
            }
        }

        tracing::debug!(
            strategy = self.name(),
            signals = signals.len(),
            "generated signals"
        );

        Ok(signals)
    }
}

//direction of a crossing between two series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    //a moved from at-or-below b to strictly above
    Above,
    //a moved from at-or-above b to strictly below
    Below,
}

impl Crossing {
    pub fn detect(prev_a: f64, prev_b: f64, a: f64, b: f64) -> Option<Crossing> {
        if prev_a <= prev_b && a > b {
            return Some(Crossing::Above);
        }
        if prev_a >= prev_b && a < b {
            return Some(Crossing::Below);
        }
        None
    }
}
