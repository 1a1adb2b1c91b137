use crate::data::bar::PriceBar;
use crate::data::series::PriceSeries;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

//parses rfc3339 or integer epoch milliseconds (kline open time)
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(millis) = raw.parse::<i64>() {
        return Utc
            .timestamp_millis_opt(millis)
            .single()
            .with_context(|| format!("epoch milliseconds out of range: {}", millis));
    }

    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

//loads a validated price series from a csv file
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let line = index + 2;
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", line))?;

        let timestamp = parse_timestamp(&record.timestamp).context(format!(
            "Failed to parse timestamp '{}' at line {}",
            record.timestamp, line
        ))?;

        let bar = PriceBar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        )
        .context(format!("Invalid bar at line {}", line))?;

        bars.push(bar);
    }

    //sort by timestamp to ensure chronological order
    bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    tracing::debug!(path = ?path, bars = bars.len(), "loaded price data");

    let series = PriceSeries::new(bars).context(format!("Invalid price series in {:?}", path))?;
    Ok(series)
}
