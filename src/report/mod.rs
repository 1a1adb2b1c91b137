use crate::engine::BacktestResult;
use crate::ledger::Trade;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io;
use std::path::Path;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//one exported trade row
#[derive(Debug, Serialize)]
struct TradeRecord<'a> {
    #[serde(rename = "Entry Time")]
    entry_time: String,
    #[serde(rename = "Entry Price")]
    entry_price: f64,
    #[serde(rename = "Exit Time")]
    exit_time: Option<String>,
    #[serde(rename = "Exit Price")]
    exit_price: Option<f64>,
    #[serde(rename = "Strategy")]
    strategy: &'a str,
    #[serde(rename = "PnL")]
    pnl: Option<f64>,
    #[serde(rename = "Status")]
    status: &'static str,
}

impl<'a> From<&'a Trade> for TradeRecord<'a> {
    fn from(trade: &'a Trade) -> Self {
        TradeRecord {
            entry_time: trade.entry_time.to_rfc3339(),
            entry_price: round2(trade.entry_price),
            exit_time: trade.exit_time.map(|t| t.to_rfc3339()),
            exit_price: trade.exit_price.map(round2),
            strategy: &trade.strategy,
            pnl: trade.pnl.map(round2),
            status: trade.outcome_label(),
        }
    }
}

//one exported summary row per strategy
#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    #[serde(rename = "Strategy")]
    strategy: &'a str,
    #[serde(rename = "Total Trades")]
    trade_count: usize,
    #[serde(rename = "Win Rate")]
    win_rate_pct: f64,
    #[serde(rename = "Total PnL")]
    total_pnl: f64,
    #[serde(rename = "Average PnL")]
    avg_pnl: f64,
    #[serde(rename = "Winning Trades")]
    winning_trades: usize,
    #[serde(rename = "Losing Trades")]
    losing_trades: usize,
    #[serde(rename = "Profit Factor")]
    profit_factor: f64,
    #[serde(rename = "Max Drawdown")]
    max_drawdown: f64,
}

impl<'a> From<&'a BacktestResult> for SummaryRecord<'a> {
    fn from(result: &'a BacktestResult) -> Self {
        let summary = &result.summary;
        SummaryRecord {
            strategy: &result.strategy,
            trade_count: summary.trade_count,
            win_rate_pct: round2(summary.win_rate * 100.0),
            total_pnl: round2(summary.total_pnl),
            avg_pnl: round2(summary.avg_pnl),
            winning_trades: summary.winning_trades,
            losing_trades: summary.losing_trades,
            profit_factor: summary.profit_factor,
            max_drawdown: round2(summary.max_drawdown),
        }
    }
}

//writes trades as csv with prices and pnl rounded to cents
pub fn write_trades<W: io::Write>(writer: W, trades: &[Trade]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for trade in trades {
        wtr.serialize(TradeRecord::from(trade))?;
    }
    wtr.flush()?;
    Ok(())
}

//writes one summary row per run
pub fn write_summaries<W: io::Write>(writer: W, results: &[BacktestResult]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for result in results {
        wtr.serialize(SummaryRecord::from(result))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_trades_csv<P: AsRef<Path>>(path: P, trades: &[Trade]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .context(format!("Failed to create trades file: {:?}", path))?;
    write_trades(file, trades)
}

pub fn write_summaries_csv<P: AsRef<Path>>(path: P, results: &[BacktestResult]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .context(format!("Failed to create summary file: {:?}", path))?;
    write_summaries(file, results)
}
