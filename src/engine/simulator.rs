use crate::data::{PriceBar, PriceSeries};
use crate::error::{BacktestError, Result};
use crate::ledger::{ExitReason, Trade};
use crate::strategy::{Signal, SignalKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//what to do with a trade that is still open when the data runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndOfDataPolicy {
    //close at the last bar's close price
    #[default]
    ForceClose,
    //drop the unclosed trade from the ledger
    Discard,
}

impl EndOfDataPolicy {
    //parse policy from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "force_close" | "force-close" | "close" => Some(EndOfDataPolicy::ForceClose),
            "discard" | "drop" => Some(EndOfDataPolicy::Discard),
            _ => None,
        }
    }
}

//effect of a single processed signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalOutcome {
    Opened,
    //carries the realized pnl
    Closed(f64),
    Ignored,
}

//turns a signal sequence into a ledger of closed trades
//holds at most one open trade; anomalous signals are logged and skipped
#[derive(Debug)]
pub struct TradeSimulator {
    strategy: String,
    position_size: f64,
    end_of_data: EndOfDataPolicy,
    open_trade: Option<Trade>,
    ledger: Vec<Trade>,
    last_signal_time: Option<DateTime<Utc>>,
    ignored: usize,
}

impl TradeSimulator {
    pub fn new(
        strategy: impl Into<String>,
        position_size: f64,
        end_of_data: EndOfDataPolicy,
    ) -> Result<Self> {
        if !position_size.is_finite() || position_size <= 0.0 {
            return Err(BacktestError::InvalidPositionSize(position_size));
        }

        Ok(TradeSimulator {
            strategy: strategy.into(),
            position_size,
            end_of_data,
            open_trade: None,
            ledger: Vec::new(),
            last_signal_time: None,
            ignored: 0,
        })
    }

    //applies one signal to the position state
    pub fn process(&mut self, signal: &Signal) -> SignalOutcome {
        if let Some(last) = self.last_signal_time {
            if signal.timestamp < last {
                return self.ignore(signal, "signal out of time order");
            }
        }
        self.last_signal_time = Some(signal.timestamp);

        match (signal.kind, self.open_trade.take()) {
            (SignalKind::Entry, None) => {
                let trade = Trade::open(
                    self.strategy.clone(),
                    signal.timestamp,
                    signal.price,
                    self.position_size,
                );
                tracing::info!(
                    strategy = %self.strategy,
                    time = %signal.timestamp,
                    price = signal.price,
                    "opened trade"
                );
                self.open_trade = Some(trade);
                SignalOutcome::Opened
            }
            (SignalKind::Entry, Some(open)) => {
                self.open_trade = Some(open);
                self.ignore(signal, "entry while a trade is already open")
            }
            (SignalKind::Exit, None) => self.ignore(signal, "exit with no open trade"),
            (SignalKind::Exit, Some(open)) if signal.timestamp <= open.entry_time => {
                self.open_trade = Some(open);
                self.ignore(signal, "exit not after entry")
            }
            (SignalKind::Exit, Some(mut trade)) => {
                let pnl = trade
                    .close(signal.timestamp, signal.price, ExitReason::Signal)
                    .unwrap_or_default();
                tracing::info!(
                    strategy = %self.strategy,
                    time = %signal.timestamp,
                    price = signal.price,
                    pnl,
                    "closed trade"
                );
                self.ledger.push(trade);
                SignalOutcome::Closed(pnl)
            }
        }
    }

    fn ignore(&mut self, signal: &Signal, reason: &str) -> SignalOutcome {
        self.ignored += 1;
        tracing::warn!(
            strategy = %self.strategy,
            time = %signal.timestamp,
            kind = ?signal.kind,
            reason,
            "ignoring signal"
        );
        SignalOutcome::Ignored
    }

    pub fn open_trade(&self) -> Option<&Trade> {
        self.open_trade.as_ref()
    }

    //closed trades so far
    pub fn ledger(&self) -> &[Trade] {
        &self.ledger
    }

    //number of anomalous signals skipped
    pub fn ignored_signals(&self) -> usize {
        self.ignored
    }

    //settles any open trade against the last bar and returns the ledger
    pub fn finish(mut self, last_bar: &PriceBar) -> Vec<Trade> {
        let Some(mut trade) = self.open_trade.take() else {
            return self.ledger;
        };

        match self.end_of_data {
            EndOfDataPolicy::ForceClose if last_bar.timestamp > trade.entry_time => {
                let pnl = trade
                    .close(last_bar.timestamp, last_bar.close, ExitReason::EndOfData)
                    .unwrap_or_default();
                tracing::info!(
                    strategy = %self.strategy,
                    time = %last_bar.timestamp,
                    price = last_bar.close,
                    pnl,
                    "force-closed trade at end of data"
                );
                self.ledger.push(trade);
            }
            EndOfDataPolicy::ForceClose => {
                tracing::warn!(
                    strategy = %self.strategy,
                    entry_time = %trade.entry_time,
                    "discarding trade opened on the last bar"
                );
            }
            EndOfDataPolicy::Discard => {
                tracing::info!(
                    strategy = %self.strategy,
                    entry_time = %trade.entry_time,
                    "discarding unclosed trade at end of data"
                );
            }
        }

        self.ledger
    }

    //processes every signal in order, then settles at the series' last bar
    pub fn run(mut self, signals: &[Signal], series: &PriceSeries) -> Vec<Trade> {
        for signal in signals {
            self.process(signal);
        }
        self.finish(series.last())
    }
}
