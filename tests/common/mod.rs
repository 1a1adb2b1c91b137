#![allow(dead_code)]

use candle_backtest::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn ts(i: usize) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(i as i64)
}

//bar with a 1% range around the close
pub fn bar(i: usize, close: f64) -> PriceBar {
    PriceBar::new(ts(i), close, close * 1.01, close * 0.99, close, 10.0).unwrap()
}

pub fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(closes.iter().enumerate().map(|(i, &c)| bar(i, c)).collect()).unwrap()
}

//slow sine wave with a gentle drift, enough to trigger both strategies
pub fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = i as f64;
            100.0 + 8.0 * (x / 9.0).sin() + 3.0 * (x / 3.7).cos() + 0.01 * x
        })
        .collect()
}

//writes closes as a candle csv and returns its path
pub fn write_candles(dir: &Path, closes: &[f64]) -> PathBuf {
    let path = dir.join("candles.csv");
    let mut file = std::fs::File::create(&path).unwrap();

    writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
    for (i, &close) in closes.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            ts(i).to_rfc3339(),
            close,
            close * 1.01,
            close * 0.99,
            close,
            10.0
        )
        .unwrap();
    }

    path
}

//indicator row whose macd line acts as a scripted marker
pub fn marker_row(i: usize, close: f64, marker: f64) -> IndicatorRow {
    IndicatorRow {
        timestamp: ts(i),
        close,
        ema_trend: Some(close),
        macd_line: Some(marker),
        macd_signal: Some(0.0),
        rsi: None,
    }
}

//enters on a positive marker and exits on a negative one
pub struct ScriptedStrategy;

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn warmup(&self) -> usize {
        1
    }

    fn required_indicators(&self) -> &'static [Indicator] {
        &[Indicator::Macd]
    }

    fn entry_condition(&self, _prev: &IndicatorRow, current: &IndicatorRow) -> bool {
        current.macd_line.is_some_and(|m| m > 0.0)
    }

    fn exit_condition(&self, _prev: &IndicatorRow, current: &IndicatorRow) -> bool {
        current.macd_line.is_some_and(|m| m < 0.0)
    }
}
