use anyhow::{Context, Result};
use candle_backtest::prelude::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser)]
#[command(name = "candle-backtest")]
#[command(about = "Backtests MACD and RSI-EMA strategies over OHLCV candles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a backtest
    Run {
        //path to csv data file (timestamp,open,high,low,close,volume)
        #[arg(long)]
        data: PathBuf,

        //json configuration file, defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        //strategy to run (macd, rsi_ema, all)
        #[arg(long, default_value = "all")]
        strategy: String,

        //units per trade, overrides the config file
        #[arg(long)]
        position_size: Option<f64>,

        //open trade handling at end of data (force_close, discard)
        #[arg(long)]
        end_of_data: Option<String>,

        //directory for trade and summary csv files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    //write the default configuration as json
    InitConfig {
        path: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            config,
            strategy,
            position_size,
            end_of_data,
            output_dir,
        } => {
            run_backtest(
                data,
                config,
                strategy,
                position_size,
                end_of_data,
                output_dir,
            )?;
        }
        Commands::InitConfig { path } => {
            BacktestConfiguration::default()
                .to_json_file(&path)
                .context(format!("Failed to write config to {:?}", path))?;
            println!("Default configuration written to {:?}", path);
        }
    }

    Ok(())
}

//resolves the strategy selector into the kinds to run
fn strategy_kinds(selector: &str) -> Result<Vec<StrategyKind>> {
    if selector.eq_ignore_ascii_case("all") {
        return Ok(StrategyKind::all().to_vec());
    }
    Ok(vec![StrategyKind::parse(selector)?])
}

fn run_backtest(
    data_path: PathBuf,
    config_path: Option<PathBuf>,
    strategy: String,
    position_size: Option<f64>,
    end_of_data: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    println!("Candle Backtester");
    println!("=================\n");

    //load configuration
    let mut config = match &config_path {
        Some(path) => BacktestConfiguration::from_json_file(path)?,
        None => BacktestConfiguration::default(),
    };
    if let Some(size) = position_size {
        config.position_size = size;
    }
    if let Some(policy) = end_of_data {
        config.end_of_data = EndOfDataPolicy::parse(&policy)
            .ok_or_else(|| anyhow::anyhow!("Unknown end-of-data policy: {}", policy))?;
    }

    let kinds = strategy_kinds(&strategy)?;
    let backtester = Backtester::new(config)?;

    //load data
    println!("Loading data from {:?}...", data_path);
    let series =
        load_csv(&data_path).context(format!("Failed to load data from {:?}", data_path))?;

    println!("Loaded {} bars", series.len());
    println!(
        "Date range: {} to {}\n",
        series.first().timestamp,
        series.last().timestamp
    );

    //run backtests
    let results = backtester.run_all(&kinds, &series)?;

    for result in &results {
        println!("{}", result.strategy);
        println!("{}\n", "=".repeat(result.strategy.len()));
        result.summary.pretty_print_table();
        println!();
    }

    //save outputs if requested
    if let Some(dir) = output_dir {
        save_results(&dir, &results)?;
    }

    Ok(())
}

fn save_results(dir: &Path, results: &[BacktestResult]) -> Result<()> {
    std::fs::create_dir_all(dir).context(format!("Failed to create {:?}", dir))?;

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let trades: Vec<Trade> = results
        .iter()
        .flat_map(|result| result.trades.iter().cloned())
        .collect();

    let trades_path = dir.join(format!("backtester_results_{}.csv", stamp));
    write_trades_csv(&trades_path, &trades)?;
    println!("Trades saved to {:?}", trades_path);

    let summary_path = dir.join(format!("summary_metrics_{}.csv", stamp));
    write_summaries_csv(&summary_path, results)?;
    println!("Summary metrics saved to {:?}", summary_path);

    Ok(())
}
