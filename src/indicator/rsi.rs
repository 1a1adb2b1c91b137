use crate::error::{BacktestError, Result};

pub const DEFAULT_PERIOD: usize = 14;

//relative strength index over simple rolling averages of gains and losses
//index i uses the `period` price changes ending at bar i, so the first
//defined value sits at index `period`; earlier indices are None
pub fn compute_rsi(prices: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    if period < 1 {
        return Err(BacktestError::InvalidPeriod {
            indicator: "RSI",
            period,
        });
    }
    if prices.len() <= period {
        return Err(BacktestError::InsufficientData {
            indicator: "RSI",
            bars: prices.len(),
            required: period,
        });
    }

    if let Some(index) = prices.iter().position(|p| !p.is_finite()) {
        return Err(BacktestError::NonFiniteValue {
            indicator: "RSI",
            index,
        });
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let mut values = vec![None; prices.len()];

    for bar in period..prices.len() {
        let window = &changes[bar - period..bar];
        let avg_gain = window.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
        let avg_loss = window.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;
        values[bar] = Some(rsi_value(avg_gain, avg_loss));
    }

    Ok(values)
}

//no losses in the window means maximum strength
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
