use crate::config::{BacktestConfiguration, StrategyKind};
use crate::data::PriceSeries;
use crate::engine::simulator::TradeSimulator;
use crate::error::Result;
use crate::indicator::{Indicator, IndicatorSet};
use crate::ledger::Trade;
use crate::metrics::{cumulative_pnl_curve, PerformanceSummary, PnlPoint};
use crate::strategy::{Signal, Strategy};
use serde::Serialize;

//result of a single strategy run
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub strategy: String,
    pub signals: Vec<Signal>,
    pub trades: Vec<Trade>,
    pub summary: PerformanceSummary,
    pub pnl_curve: Vec<PnlPoint>,
}

//wires indicators, signals, simulation and metrics for one configuration
#[derive(Debug, Clone)]
pub struct Backtester {
    config: BacktestConfiguration,
}

impl Backtester {
    //creates a backtester, rejecting invalid configuration up front
    pub fn new(config: BacktestConfiguration) -> Result<Self> {
        config.validate()?;
        Ok(Backtester { config })
    }

    //computes the indicator columns the given strategies read, and nothing else
    pub fn indicators_for(
        &self,
        strategies: &[Box<dyn Strategy>],
        series: &PriceSeries,
    ) -> Result<IndicatorSet> {
        let mut required: Vec<Indicator> = Vec::new();
        for &indicator in strategies.iter().flat_map(|s| s.required_indicators()) {
            if !required.contains(&indicator) {
                required.push(indicator);
            }
        }
        IndicatorSet::compute_for(series, &self.config.indicator_params(), &required)
    }

    //runs the configured strategy
    pub fn run(&self, series: &PriceSeries) -> Result<BacktestResult> {
        let strategy = self.config.build_strategy(self.config.strategy);
        let indicators = self.indicators_for(std::slice::from_ref(&strategy), series)?;
        self.run_strategy(strategy.as_ref(), series, &indicators)
    }

    //runs each strategy in turn over one shared indicator set
    pub fn run_all(
        &self,
        kinds: &[StrategyKind],
        series: &PriceSeries,
    ) -> Result<Vec<BacktestResult>> {
        let strategies: Vec<Box<dyn Strategy>> = kinds
            .iter()
            .map(|&kind| self.config.build_strategy(kind))
            .collect();
        let indicators = self.indicators_for(&strategies, series)?;

        strategies
            .iter()
            .map(|strategy| self.run_strategy(strategy.as_ref(), series, &indicators))
            .collect()
    }

    //runs one strategy against precomputed indicators
    pub fn run_strategy(
        &self,
        strategy: &dyn Strategy,
        series: &PriceSeries,
        indicators: &IndicatorSet,
    ) -> Result<BacktestResult> {
        let signals = strategy.generate_signals(series, indicators)?;

        let simulator = TradeSimulator::new(
            strategy.name(),
            self.config.position_size,
            self.config.end_of_data,
        )?;
        let trades = simulator.run(&signals, series);

        let summary = PerformanceSummary::from_trades(&trades);
        let pnl_curve = cumulative_pnl_curve(&trades);

        tracing::info!(
            strategy = strategy.name(),
            signals = signals.len(),
            trades = summary.trade_count,
            total_pnl = summary.total_pnl,
            "backtest complete"
        );

        Ok(BacktestResult {
            strategy: strategy.name().to_string(),
            signals,
            trades,
            summary,
            pnl_curve,
        })
    }
}
