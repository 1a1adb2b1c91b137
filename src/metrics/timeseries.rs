use crate::ledger::Trade;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//a point on the realized pnl curve, one per closed trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlPoint {
    pub timestamp: DateTime<Utc>,
    pub cumulative_pnl: f64,
    //distance below the running peak, in pnl units
    pub drawdown: f64,
}

impl PnlPoint {
    pub fn new(timestamp: DateTime<Utc>, cumulative_pnl: f64, drawdown: f64) -> Self {
        PnlPoint {
            timestamp,
            cumulative_pnl,
            drawdown,
        }
    }
}

//builds the cumulative pnl curve from closed trades in exit order
//the running peak starts at zero (flat before the first trade)
pub fn cumulative_pnl_curve(trades: &[Trade]) -> Vec<PnlPoint> {
    let mut curve = Vec::with_capacity(trades.len());
    let mut cumulative = 0.0;
    let mut peak = 0.0_f64;

    for trade in trades {
        let (Some(timestamp), Some(pnl)) = (trade.exit_time, trade.pnl) else {
            continue;
        };

        cumulative += pnl;
        peak = peak.max(cumulative);

        curve.push(PnlPoint::new(timestamp, cumulative, peak - cumulative));
    }

    curve
}

//calculates maximum drawdown from the pnl curve
pub fn max_drawdown(curve: &[PnlPoint]) -> f64 {
    curve.iter().map(|point| point.drawdown).fold(0.0, f64::max)
}
