use crate::engine::EndOfDataPolicy;
use crate::error::{BacktestError, Result};
use crate::indicator::{macd, IndicatorParams};
use crate::strategy::{MacdStrategy, RsiEmaStrategy, Strategy};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

//strategy selector
//deserializes through `StrategyKind::parse`, so any accepted spelling works in json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum StrategyKind {
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "RSI_EMA")]
    RsiEma,
}

impl StrategyKind {
    //parse strategy kind from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "macd" => Ok(StrategyKind::Macd),
            "rsi_ema" | "rsi-ema" | "rsiema" => Ok(StrategyKind::RsiEma),
            _ => Err(BacktestError::UnknownStrategy(s.to_string())),
        }
    }

    //every strategy, in batch order
    pub fn all() -> [StrategyKind; 2] {
        [StrategyKind::Macd, StrategyKind::RsiEma]
    }
}

impl FromStr for StrategyKind {
    type Err = BacktestError;

    fn from_str(s: &str) -> Result<Self> {
        StrategyKind::parse(s)
    }
}

impl TryFrom<String> for StrategyKind {
    type Error = BacktestError;

    fn try_from(s: String) -> Result<Self> {
        StrategyKind::parse(&s)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Macd => write!(f, "MACD"),
            StrategyKind::RsiEma => write!(f, "RSI_EMA"),
        }
    }
}

//complete backtest configuration
//missing json fields fall back to their defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfiguration {
    //data (informational, consumed by whatever fetches the candles)
    pub candle_interval: String,
    pub lookback_count: usize,

    //indicators
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub macd_signal_period: usize,
    pub rsi_period: usize,
    pub ema_trend_period: usize,

    //strategy
    pub strategy: StrategyKind,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,

    //simulation
    pub position_size: f64,
    pub end_of_data: EndOfDataPolicy,
}

impl Default for BacktestConfiguration {
    fn default() -> Self {
        BacktestConfiguration {
            candle_interval: "1m".to_string(),
            lookback_count: 5000,
            ema_fast: macd::DEFAULT_FAST,
            ema_slow: macd::DEFAULT_SLOW,
            macd_signal_period: macd::DEFAULT_SIGNAL,
            rsi_period: 14,
            ema_trend_period: 21,
            strategy: StrategyKind::Macd,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            position_size: 1.0,
            end_of_data: EndOfDataPolicy::ForceClose,
        }
    }
}

impl BacktestConfiguration {
    //checks everything that does not depend on the series length
    pub fn validate(&self) -> Result<()> {
        macd::validate_periods(self.ema_fast, self.ema_slow, self.macd_signal_period)?;

        if self.rsi_period < 1 {
            return Err(BacktestError::InvalidPeriod {
                indicator: "RSI",
                period: self.rsi_period,
            });
        }
        if self.ema_trend_period < 1 {
            return Err(BacktestError::InvalidPeriod {
                indicator: "EMA",
                period: self.ema_trend_period,
            });
        }

        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.rsi_oversold)
            || !in_range(self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(BacktestError::InvalidThresholds {
                oversold: self.rsi_oversold,
                overbought: self.rsi_overbought,
            });
        }

        if !self.position_size.is_finite() || self.position_size <= 0.0 {
            return Err(BacktestError::InvalidPositionSize(self.position_size));
        }

        Ok(())
    }

    pub fn indicator_params(&self) -> IndicatorParams {
        IndicatorParams {
            ema_fast: self.ema_fast,
            ema_slow: self.ema_slow,
            macd_signal: self.macd_signal_period,
            rsi_period: self.rsi_period,
            ema_trend: self.ema_trend_period,
        }
    }

    //builds the given strategy with this configuration's parameters
    pub fn build_strategy(&self, kind: StrategyKind) -> Box<dyn Strategy> {
        match kind {
            StrategyKind::Macd => Box::new(MacdStrategy::new(
                self.ema_fast,
                self.ema_slow,
                self.macd_signal_period,
            )),
            StrategyKind::RsiEma => Box::new(RsiEmaStrategy::new(
                self.rsi_period,
                self.rsi_oversold,
                self.rsi_overbought,
            )),
        }
    }

    //load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;
        Self::from_json_str(&contents).context(format!("Failed to parse config file: {:?}", path))
    }

    //parses configuration json
    //an unknown strategy surfaces as `BacktestError::UnknownStrategy`, not a serde error
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(name) = value.get("strategy").and_then(|v| v.as_str()) {
            StrategyKind::parse(name)?;
        }
        Ok(serde_json::from_value(value)?)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_config_is_valid() {
        let config = BacktestConfiguration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.strategy, StrategyKind::Macd);
        assert_eq!(config.lookback_count, 5000);
    }

    #[test]
    fn parses_strategy_kind() {
        assert_eq!(StrategyKind::parse("MACD").unwrap(), StrategyKind::Macd);
        assert_eq!("rsi_ema".parse::<StrategyKind>().unwrap(), StrategyKind::RsiEma);

        let err = StrategyKind::parse("sma").unwrap_err();
        assert_eq!(err, BacktestError::UnknownStrategy("sma".to_string()));
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn rejects_fast_not_below_slow() {
        let config = BacktestConfiguration {
            ema_fast: 26,
            ema_slow: 12,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(BacktestError::FastNotBelowSlow { fast: 26, slow: 12 })
        );
    }

    #[test]
    fn rejects_bad_thresholds() {
        for (oversold, overbought) in [(70.0, 30.0), (50.0, 50.0), (-1.0, 70.0), (30.0, 101.0)] {
            let config = BacktestConfiguration {
                rsi_oversold: oversold,
                rsi_overbought: overbought,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(BacktestError::InvalidThresholds { .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_periods() {
        let config = BacktestConfiguration {
            rsi_period: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn rejects_bad_position_size() {
        let config = BacktestConfiguration {
            position_size: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(BacktestError::InvalidPositionSize(0.0))
        );
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: BacktestConfiguration =
            serde_json::from_str(r#"{"strategy": "RSI_EMA", "ema_trend_period": 50}"#).unwrap();
        assert_eq!(config.strategy, StrategyKind::RsiEma);
        assert_eq!(config.ema_trend_period, 50);
        assert_eq!(config.ema_fast, 12);
        assert_eq!(config.end_of_data, EndOfDataPolicy::ForceClose);
    }

    #[test]
    fn serializes_wire_names() {
        let json = serde_json::to_string(&BacktestConfiguration::default()).unwrap();
        assert!(json.contains(r#""strategy":"MACD""#));
        assert!(json.contains(r#""end_of_data":"FORCE_CLOSE""#));
    }

    #[test]
    fn builds_strategies() {
        let config = BacktestConfiguration::default();
        assert_eq!(
            config.build_strategy(StrategyKind::Macd).name(),
            "MACD Strategy"
        );
        assert_eq!(
            config.build_strategy(StrategyKind::RsiEma).name(),
            "RSI-EMA Strategy"
        );
    }

    #[test]
    fn unknown_json_strategy_is_a_typed_config_error() {
        let err = BacktestConfiguration::from_json_str(r#"{"strategy": "BOLLINGER"}"#).unwrap_err();
        let typed = err.downcast_ref::<BacktestError>().unwrap();
        assert_eq!(typed, &BacktestError::UnknownStrategy("BOLLINGER".to_string()));
        assert_eq!(typed.kind(), ErrorKind::Config);
    }

    #[test]
    fn json_strategy_accepts_parse_spellings() {
        let config = BacktestConfiguration::from_json_str(r#"{"strategy": "rsi-ema"}"#).unwrap();
        assert_eq!(config.strategy, StrategyKind::RsiEma);
    }
}
