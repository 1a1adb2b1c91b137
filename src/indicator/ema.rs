use crate::error::{BacktestError, Result};

//exponential moving average with smoothing k = 2/(period+1)
//seeded from the first value: ema[0] = values[0], ema[i] = v[i]*k + ema[i-1]*(1-k)
pub fn compute_ema(prices: &[f64], period: usize) -> Result<Vec<f64>> {
    ema_of(prices, period, "EMA")
}

//shared by the macd signal line so errors name the right indicator
pub(crate) fn ema_of(values: &[f64], period: usize, indicator: &'static str) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(BacktestError::EmptySeries);
    }
    if period < 1 {
        return Err(BacktestError::InvalidPeriod { indicator, period });
    }
    if period > values.len() {
        return Err(BacktestError::PeriodExceedsSeries {
            indicator,
            period,
            len: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(BacktestError::NonFiniteValue { indicator, index });
    }

    let k = smoothing(period);
    let mut ema = values[0];
    let mut out = Vec::with_capacity(values.len());
    out.push(ema);

    for &value in &values[1..] {
        ema = value * k + ema * (1.0 - k);
        out.push(ema);
    }

    Ok(out)
}

pub fn smoothing(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}
