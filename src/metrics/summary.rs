use crate::ledger::{Trade, TradeStatus};
use crate::metrics::timeseries::{cumulative_pnl_curve, max_drawdown};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

//summary statistics over a closed-trade ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub trade_count: usize,
    //fraction of trades with positive pnl, 0 when there are no trades
    pub win_rate: f64,
    pub total_pnl: f64,
    //0 when there are no trades
    pub avg_pnl: f64,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub profit_factor: f64,
    pub pnl_std_dev: f64,
    pub max_drawdown: f64,
}

impl PerformanceSummary {
    //reduces the ledger; trades that are not closed are ignored
    pub fn from_trades(trades: &[Trade]) -> Self {
        let closed: Vec<&Trade> = trades
            .iter()
            .filter(|t| t.status == TradeStatus::Closed)
            .collect();
        let pnls: Vec<f64> = closed.iter().filter_map(|t| t.pnl).collect();

        let trade_count = pnls.len();
        let total_pnl: f64 = pnls.iter().sum();

        let wins: Vec<f64> = pnls.iter().copied().filter(|&p| p > 0.0).collect();
        let losses: Vec<f64> = pnls.iter().copied().filter(|&p| p < 0.0).collect();

        let (win_rate, avg_pnl) = if trade_count > 0 {
            (
                wins.len() as f64 / trade_count as f64,
                total_pnl / trade_count as f64,
            )
        } else {
            (0.0, 0.0)
        };

        let total_wins: f64 = wins.iter().sum();
        let total_losses: f64 = losses.iter().sum::<f64>().abs();

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        //sample standard deviation needs at least two points
        let pnl_std_dev = if trade_count >= 2 {
            pnls.as_slice().std_dev()
        } else {
            0.0
        };

        let curve = cumulative_pnl_curve(trades);

        PerformanceSummary {
            trade_count,
            win_rate,
            total_pnl,
            avg_pnl,
            winning_trades: wins.len(),
            losing_trades: losses.len(),
            largest_win: wins.iter().fold(0.0f64, |a, &b| a.max(b)),
            largest_loss: losses.iter().fold(0.0f64, |a, &b| a.min(b)),
            profit_factor,
            pnl_std_dev,
            max_drawdown: max_drawdown(&curve),
        }
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        self.to_table().printstd();
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        let rows = [
            ("Total Trades", format!("{}", self.trade_count)),
            ("Win Rate", format!("{:.2}%", self.win_rate * 100.0)),
            ("Total PnL", format!("{:.2}", self.total_pnl)),
            ("Average PnL", format!("{:.2}", self.avg_pnl)),
            ("Winning Trades", format!("{}", self.winning_trades)),
            ("Losing Trades", format!("{}", self.losing_trades)),
            ("Largest Win", format!("{:.2}", self.largest_win)),
            ("Largest Loss", format!("{:.2}", self.largest_loss)),
            ("Profit Factor", format!("{:.3}", self.profit_factor)),
            ("PnL Std Dev", format!("{:.2}", self.pnl_std_dev)),
            ("Max Drawdown", format!("{:.2}", self.max_drawdown)),
        ];

        for (metric, value) in rows {
            table.add_row(Row::new(vec![Cell::new(metric), Cell::new(&value)]));
        }

        table
    }
}
