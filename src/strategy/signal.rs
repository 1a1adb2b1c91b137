use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//direction of a signal (long-only: entry buys, exit sells)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Entry,
    Exit,
}

//a discrete trading decision taken on one bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub timestamp: DateTime<Utc>,
    pub kind: SignalKind,
    pub price: f64,
}

impl Signal {
    pub fn entry(timestamp: DateTime<Utc>, price: f64) -> Self {
        Signal {
            timestamp,
            kind: SignalKind::Entry,
            price,
        }
    }

    pub fn exit(timestamp: DateTime<Utc>, price: f64) -> Self {
        Signal {
            timestamp,
            kind: SignalKind::Exit,
            price,
        }
    }

    pub fn is_entry(&self) -> bool {
        self.kind == SignalKind::Entry
    }
}
