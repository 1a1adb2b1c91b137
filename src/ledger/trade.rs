use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Open,
    Closed,
}

//why a trade was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    //an exit signal from the strategy
    Signal,
    //force-closed at the last bar of the series
    EndOfData,
}

//a single long round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    //name of the strategy that generated this trade
    pub strategy: String,

    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,

    //set once the trade is closed
    pub exit_time: Option<DateTime<Utc>>,
    pub exit_price: Option<f64>,

    //units held, fixed for the whole run
    pub position_size: f64,

    pub status: TradeStatus,

    //realized pnl, only defined when closed
    pub pnl: Option<f64>,

    pub exit_reason: Option<ExitReason>,
}

impl Trade {
    //opens a new trade
    pub fn open(
        strategy: impl Into<String>,
        entry_time: DateTime<Utc>,
        entry_price: f64,
        position_size: f64,
    ) -> Self {
        Trade {
            strategy: strategy.into(),
            entry_time,
            entry_price,
            exit_time: None,
            exit_price: None,
            position_size,
            status: TradeStatus::Open,
            pnl: None,
            exit_reason: None,
        }
    }

    //closes the trade and returns the realized pnl
    //returns none and leaves the trade untouched if it is already closed
    pub fn close(
        &mut self,
        exit_time: DateTime<Utc>,
        exit_price: f64,
        reason: ExitReason,
    ) -> Option<f64> {
        if !self.is_open() {
            return None;
        }

        let pnl = (exit_price - self.entry_price) * self.position_size;

        self.exit_time = Some(exit_time);
        self.exit_price = Some(exit_price);
        self.pnl = Some(pnl);
        self.status = TradeStatus::Closed;
        self.exit_reason = Some(reason);

        Some(pnl)
    }

    pub fn is_open(&self) -> bool {
        self.status == TradeStatus::Open
    }

    //returns true for a closed trade with positive pnl
    pub fn is_win(&self) -> bool {
        self.pnl.is_some_and(|pnl| pnl > 0.0)
    }

    //win/loss label used in reports
    pub fn outcome_label(&self) -> &'static str {
        match (self.status, self.is_win()) {
            (TradeStatus::Open, _) => "OPEN",
            (TradeStatus::Closed, true) => "WIN",
            (TradeStatus::Closed, false) => "LOSS",
        }
    }
}
