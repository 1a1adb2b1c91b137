pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::compute_ema;
pub use macd::{compute_macd, compute_macd_default, MacdSeries};
pub use rsi::compute_rsi;

use crate::data::PriceSeries;
use crate::error::Result;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

//periods for every indicator a run needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub ema_trend: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ema_fast: macd::DEFAULT_FAST,
            ema_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            rsi_period: rsi::DEFAULT_PERIOD,
            ema_trend: 21,
        }
    }
}

//indicator families a strategy can read from an indicator set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    //macd line and signal, from the fast and slow emas
    Macd,
    Rsi,
    //ema over `ema_trend` bars
    TrendEma,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Macd, Indicator::Rsi, Indicator::TrendEma];

    pub fn name(&self) -> &'static str {
        match self {
            Indicator::Macd => "MACD",
            Indicator::Rsi => "RSI",
            Indicator::TrendEma => "trend EMA",
        }
    }
}

//indicator values for a single bar
//a column is none when it was not computed (or, for rsi, not yet defined)
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub ema_trend: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub rsi: Option<f64>,
}

//indicators aligned bar-for-bar with the series they were computed from
//row i only ever depends on bars 0..=i
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    //none for externally supplied rows
    params: Option<IndicatorParams>,
    indicators: Vec<Indicator>,
    rows: Vec<IndicatorRow>,
}

impl IndicatorSet {
    //computes every indicator
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Result<Self> {
        Self::compute_for(series, params, &Indicator::ALL)
    }

    //computes only the requested indicators, the rest stay none
    //periods of indicators that were not requested are never checked
    pub fn compute_for(
        series: &PriceSeries,
        params: &IndicatorParams,
        requested: &[Indicator],
    ) -> Result<Self> {
        let indicators: Vec<Indicator> = Indicator::ALL
            .into_iter()
            .filter(|i| requested.contains(i))
            .collect();
        let wants = |indicator: Indicator| indicators.contains(&indicator);

        let mut ema_periods = Vec::new();
        if wants(Indicator::Macd) {
            macd::validate_periods(params.ema_fast, params.ema_slow, params.macd_signal)?;
            ema_periods.extend([params.ema_fast, params.ema_slow]);
        }
        if wants(Indicator::TrendEma) {
            ema_periods.push(params.ema_trend);
        }

        let closes = series.closes();

        //shared periods are computed once
        let mut emas: IndexMap<usize, Vec<f64>> = IndexMap::new();
        for period in ema_periods {
            if !emas.contains_key(&period) {
                emas.insert(period, compute_ema(&closes, period)?);
            }
        }

        let macd = match (
            wants(Indicator::Macd),
            emas.get(&params.ema_fast),
            emas.get(&params.ema_slow),
        ) {
            (true, Some(fast), Some(slow)) => {
                Some(macd::macd_from_emas(fast, slow, params.macd_signal)?)
            }
            _ => None,
        };
        let rsi = if wants(Indicator::Rsi) {
            Some(compute_rsi(&closes, params.rsi_period)?)
        } else {
            None
        };
        let trend = if wants(Indicator::TrendEma) {
            emas.get(&params.ema_trend)
        } else {
            None
        };

        let rows = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                timestamp: bar.timestamp,
                close: bar.close,
                ema_trend: trend.map(|t| t[i]),
                macd_line: macd.as_ref().map(|m| m.line[i]),
                macd_signal: macd.as_ref().map(|m| m.signal[i]),
                rsi: rsi.as_ref().and_then(|r| r[i]),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            bars = rows.len(),
            indicators = ?indicators,
            ema_periods = ?emas.keys().collect::<Vec<_>>(),
            "computed indicator set"
        );

        Ok(IndicatorSet {
            params: Some(*params),
            indicators,
            rows,
        })
    }

    //wraps externally computed rows; every column is taken as given
    pub fn from_rows(rows: Vec<IndicatorRow>) -> Self {
        IndicatorSet {
            params: None,
            indicators: Indicator::ALL.to_vec(),
            rows,
        }
    }

    //periods the set was computed with
    pub fn params(&self) -> Option<&IndicatorParams> {
        self.params.as_ref()
    }

    pub fn has(&self, indicator: Indicator) -> bool {
        self.indicators.contains(&indicator)
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
