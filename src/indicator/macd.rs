use crate::error::{BacktestError, Result};
use crate::indicator::ema::{compute_ema, ema_of};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

//macd line and its signal line, aligned with the input prices
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

impl MacdSeries {
    pub fn histogram(&self) -> Vec<f64> {
        self.line
            .iter()
            .zip(&self.signal)
            .map(|(line, signal)| line - signal)
            .collect()
    }
}

//line = ema(fast) - ema(slow), signal = ema(line, signal_period)
pub fn compute_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdSeries> {
    validate_periods(fast, slow, signal_period)?;

    let fast_ema = compute_ema(prices, fast)?;
    let slow_ema = compute_ema(prices, slow)?;

    macd_from_emas(&fast_ema, &slow_ema, signal_period)
}

pub fn compute_macd_default(prices: &[f64]) -> Result<MacdSeries> {
    compute_macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

//builds macd from already computed fast/slow emas
pub(crate) fn macd_from_emas(
    fast_ema: &[f64],
    slow_ema: &[f64],
    signal_period: usize,
) -> Result<MacdSeries> {
    let line: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema)
        .map(|(fast, slow)| fast - slow)
        .collect();

    let signal = ema_of(&line, signal_period, "MACD signal")?;

    Ok(MacdSeries { line, signal })
}

pub(crate) fn validate_periods(fast: usize, slow: usize, signal_period: usize) -> Result<()> {
    for (indicator, period) in [
        ("MACD fast", fast),
        ("MACD slow", slow),
        ("MACD signal", signal_period),
    ] {
        if period < 1 {
            return Err(BacktestError::InvalidPeriod { indicator, period });
        }
    }

    if fast >= slow {
        return Err(BacktestError::FastNotBelowSlow { fast, slow });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(len: usize) -> Vec<f64> {
        (0..len).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn line_is_fast_minus_slow_exactly() {
        let prices: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        let macd = compute_macd(&prices, 12, 26, 9).unwrap();

        let fast = compute_ema(&prices, 12).unwrap();
        let slow = compute_ema(&prices, 26).unwrap();

        for i in 0..prices.len() {
            assert_eq!(macd.line[i], fast[i] - slow[i], "mismatch at index {}", i);
        }
    }

    #[test]
    fn signal_is_ema_of_line() {
        let prices = ramp(40);
        let macd = compute_macd_default(&prices).unwrap();
        let expected = compute_ema(&macd.line, DEFAULT_SIGNAL).unwrap();
        assert_eq!(macd.signal, expected);
    }

    #[test]
    fn histogram_equals_line_minus_signal() {
        let macd = compute_macd(&ramp(30), 3, 5, 2).unwrap();
        for ((h, l), s) in macd.histogram().iter().zip(&macd.line).zip(&macd.signal) {
            assert_relative_eq!(*h, l - s);
        }
    }

    #[test]
    fn rising_prices_give_positive_line() {
        let macd = compute_macd_default(&ramp(60)).unwrap();
        assert!(macd.line[59] > 0.0);
    }

    #[test]
    fn fast_not_below_slow_is_config_error() {
        let err = compute_macd(&ramp(60), 26, 12, 9).unwrap_err();
        assert_eq!(err, BacktestError::FastNotBelowSlow { fast: 26, slow: 12 });

        let err = compute_macd(&ramp(60), 12, 12, 9).unwrap_err();
        assert_eq!(err, BacktestError::FastNotBelowSlow { fast: 12, slow: 12 });
    }

    #[test]
    fn zero_period_is_config_error() {
        assert!(matches!(
            compute_macd(&ramp(60), 12, 26, 0),
            Err(BacktestError::InvalidPeriod {
                indicator: "MACD signal",
                ..
            })
        ));
    }

    #[test]
    fn slow_period_longer_than_series_fails() {
        let err = compute_macd_default(&ramp(20)).unwrap_err();
        assert!(matches!(err, BacktestError::PeriodExceedsSeries { period: 26, .. }));
    }
}
