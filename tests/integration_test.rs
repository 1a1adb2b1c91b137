mod common;

use approx::assert_abs_diff_eq;
use candle_backtest::prelude::*;
use common::*;

#[test]
fn scripted_round_trips_produce_expected_summary() {
    let closes = [50.0, 100.0, 110.0, 90.0, 95.0];
    let markers = [0.0, 1.0, -1.0, 1.0, -1.0];

    let series = series(&closes);
    let indicators = IndicatorSet::from_rows(
        closes
            .iter()
            .zip(markers)
            .enumerate()
            .map(|(i, (&c, m))| marker_row(i, c, m))
            .collect(),
    );

    let backtester = Backtester::new(BacktestConfiguration::default()).unwrap();
    let result = backtester
        .run_strategy(&ScriptedStrategy, &series, &indicators)
        .unwrap();

    let pnls: Vec<_> = result.trades.iter().map(|t| t.pnl.unwrap()).collect();
    assert_eq!(pnls, vec![10.0, 5.0]);
    assert_eq!(result.summary.trade_count, 2);
    assert_eq!(result.summary.total_pnl, 15.0);
    assert_eq!(result.summary.win_rate, 1.0);
    assert_eq!(result.summary.avg_pnl, 7.5);
}

#[test]
fn no_signals_gives_zeroed_summary() {
    let closes = [100.0, 101.0, 102.0];
    let series = series(&closes);
    let indicators = IndicatorSet::from_rows(
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| marker_row(i, c, 0.0))
            .collect(),
    );

    let backtester = Backtester::new(BacktestConfiguration::default()).unwrap();
    let result = backtester
        .run_strategy(&ScriptedStrategy, &series, &indicators)
        .unwrap();

    assert!(result.trades.is_empty());
    assert_eq!(result.summary.trade_count, 0);
    assert_eq!(result.summary.win_rate, 0.0);
    assert_eq!(result.summary.avg_pnl, 0.0);
    assert_eq!(result.summary.total_pnl, 0.0);
}

#[test]
fn misaligned_indicators_are_an_input_error() {
    let series = series(&[100.0, 101.0, 102.0]);
    let indicators = IndicatorSet::from_rows(vec![marker_row(0, 100.0, 0.0)]);

    let err = ScriptedStrategy
        .generate_signals(&series, &indicators)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}

#[test]
fn constant_prices_give_constant_ema() {
    let prices = vec![42.5; 60];
    for period in [1, 5, 12, 26, 60] {
        let ema = compute_ema(&prices, period).unwrap();
        for value in ema {
            assert_abs_diff_eq!(value, 42.5, epsilon = 1e-9);
        }
    }
}

#[test]
fn macd_line_is_exact_ema_difference() {
    let closes = wave(200);
    let params = IndicatorParams::default();
    let indicators = IndicatorSet::compute(&series(&closes), &params).unwrap();

    let fast = compute_ema(&closes, params.ema_fast).unwrap();
    let slow = compute_ema(&closes, params.ema_slow).unwrap();

    for (i, row) in indicators.rows().iter().enumerate() {
        assert_eq!(row.macd_line, Some(fast[i] - slow[i]));
    }
}

#[test]
fn rsi_stays_in_bounds_and_follows_trend() {
    for period in [2, 7, 14] {
        let rsi = compute_rsi(&wave(300), period).unwrap();
        assert!(rsi.iter().flatten().all(|v| (0.0..=100.0).contains(v)));
        assert!(rsi[..period].iter().all(Option::is_none));
    }

    let rising: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
    let falling: Vec<f64> = rising.iter().rev().copied().collect();

    assert_abs_diff_eq!(compute_rsi(&rising, 14).unwrap()[39].unwrap(), 100.0);
    assert_abs_diff_eq!(compute_rsi(&falling, 14).unwrap()[39].unwrap(), 0.0);
}

#[test]
fn full_pipeline_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_candles(dir.path(), &wave(500));

    let series = load_csv(&path).unwrap();
    assert_eq!(series.len(), 500);

    let backtester = Backtester::new(BacktestConfiguration::default()).unwrap();
    let results = backtester.run_all(&StrategyKind::all(), &series).unwrap();
    assert_eq!(results.len(), 2);

    for result in &results {
        assert!(!result.signals.is_empty(), "{} emitted no signals", result.strategy);

        //replaying the signals never holds more than one open trade
        let mut simulator =
            TradeSimulator::new(result.strategy.clone(), 1.0, EndOfDataPolicy::Discard).unwrap();
        for signal in &result.signals {
            simulator.process(signal);
            assert!(simulator.ledger().iter().all(|t| !t.is_open()));
        }
        assert_eq!(simulator.ignored_signals(), 0);

        for trade in &result.trades {
            assert_eq!(trade.status, TradeStatus::Closed);
            assert!(trade.exit_time.unwrap() > trade.entry_time);
            assert_abs_diff_eq!(
                trade.pnl.unwrap(),
                trade.exit_price.unwrap() - trade.entry_price,
                epsilon = 1e-9
            );
        }

        let summary = &result.summary;
        assert_abs_diff_eq!(
            summary.total_pnl,
            result.trades.iter().filter_map(|t| t.pnl).sum::<f64>(),
            epsilon = 1e-9
        );
        assert!((0.0..=1.0).contains(&summary.win_rate));
    }

    let out = dir.path().join("trades.csv");
    let trades: Vec<Trade> = results.iter().flat_map(|r| r.trades.clone()).collect();
    write_trades_csv(&out, &trades).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), trades.len() + 1);
}

#[test]
fn config_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = BacktestConfiguration {
        strategy: StrategyKind::RsiEma,
        ema_trend_period: 34,
        position_size: 2.5,
        end_of_data: EndOfDataPolicy::Discard,
        ..Default::default()
    };
    config.to_json_file(&path).unwrap();

    let loaded = BacktestConfiguration::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn unknown_strategy_is_a_config_error() {
    let err = "bollinger".parse::<StrategyKind>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn unsorted_csv_rows_are_sorted_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unsorted.csv");
    std::fs::write(
        &path,
        "timestamp,open,high,low,close,volume\n\
         2024-01-01T00:02:00Z,3,3,3,3,1\n\
         2024-01-01T00:00:00Z,1,1,1,1,1\n\
         2024-01-01T00:01:00Z,2,2,2,2,1\n",
    )
    .unwrap();

    let series = load_csv(&path).unwrap();
    assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn rsi_ema_backtest_on_short_series() {
    let config = BacktestConfiguration {
        strategy: StrategyKind::RsiEma,
        ..Default::default()
    };
    let result = Backtester::new(config)
        .unwrap()
        .run(&series(&wave(25)))
        .unwrap();
    assert_eq!(result.strategy, "RSI-EMA Strategy");
}

#[test]
fn non_finite_prices_fail_fast() {
    let bars = vec![PriceBar::from_close(ts(0), 100.0), PriceBar::from_close(ts(1), f64::NAN)];
    assert_eq!(PriceSeries::new(bars).unwrap_err().kind(), ErrorKind::Input);

    let err = compute_rsi(&[100.0, 101.0, f64::NAN, 102.0, 103.0], 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
    let err = compute_ema(&[100.0, f64::NAN, 101.0, 102.0], 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}

#[test]
fn strategy_rejects_indicator_set_with_other_periods() {
    let series = series(&wave(120));
    let set = IndicatorSet::compute(&series, &IndicatorParams::default()).unwrap();

    let err = MacdStrategy::new(5, 10, 3)
        .generate_signals(&series, &set)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}
