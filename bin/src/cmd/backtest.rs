//! Backtest command implementation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use apogee_eval::{
    BacktestConfig, Evaluator, LegSizing, PerformanceSummary, ReturnSource, Strategy,
    StrategyKind,
};
use clap::{Args, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

use crate::data;

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable summary per strategy
    Text,
    /// One JSON array of summaries
    Json,
}

/// Arguments of `apogee backtest`.
#[derive(Debug, Args)]
pub(crate) struct BacktestArgs {
    /// Strategies to evaluate (see `apogee strategies`)
    #[arg(required = true)]
    pub(crate) strategies: Vec<String>,

    /// CSV data files, merged into one market
    #[arg(short, long, required = true, num_args = 1..)]
    pub(crate) data: Vec<PathBuf>,

    /// JSON backtest configuration; flags override its values
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Fraction of the universe per leg, in (0, 0.5]
    #[arg(short, long, conflicts_with = "count")]
    pub(crate) selection: Option<f64>,

    /// Number of instruments per leg
    #[arg(short = 'n', long)]
    pub(crate) count: Option<usize>,

    /// Confidence level of VaR and CVaR
    #[arg(long)]
    pub(crate) confidence: Option<f64>,

    /// Metric holding per-period returns
    #[arg(long, conflicts_with = "price_metric")]
    pub(crate) return_metric: Option<String>,

    /// Metric holding prices to compute returns from
    #[arg(long)]
    pub(crate) price_metric: Option<String>,

    /// Registered signal for the ranked strategies (see `apogee signals`)
    #[arg(long)]
    pub(crate) signal: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub(crate) format: OutputFormat,

    /// Log debug output, including every rebalance (overridden by RUST_LOG)
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BacktestArgs {
    /// Configuration file (or defaults) with flag overrides applied.
    fn config(&self) -> Result<BacktestConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                BacktestConfig::from_json(&json)?
            }
            None => BacktestConfig::default(),
        };
        if let Some(fraction) = self.selection {
            config.sizing = LegSizing::Fraction(fraction);
        }
        if let Some(count) = self.count {
            config.sizing = LegSizing::Count(count);
        }
        if let Some(confidence) = self.confidence {
            config.confidence = confidence;
        }
        if let Some(metric) = &self.return_metric {
            config.return_source = ReturnSource::returns(metric.as_str());
        }
        if let Some(metric) = &self.price_metric {
            config.return_source = ReturnSource::prices(metric.as_str());
        }
        if let Some(signal) = &self.signal {
            config.signal.clone_from(signal);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parsed strategy kinds in input order, skipping unknown names and repeats.
    fn kinds(&self) -> Vec<StrategyKind> {
        let mut kinds = Vec::with_capacity(self.strategies.len());
        for name in &self.strategies {
            match name.parse::<StrategyKind>() {
                Ok(kind) if kinds.contains(&kind) => {
                    warn!("skipping repeated strategy {name}");
                }
                Ok(kind) => kinds.push(kind),
                Err(e) => warn!("skipping strategy: {e}"),
            }
        }
        kinds
    }
}

#[derive(Debug, Serialize)]
struct Report {
    strategy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<PerformanceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run every requested strategy against the data and print a summary of each.
pub(crate) fn run_backtest(args: &BacktestArgs) -> Result<()> {
    let config = args.config()?;
    let kinds = args.kinds();
    if kinds.is_empty() {
        bail!("no known strategy among {:?}", args.strategies);
    }

    let market = data::load_market_data(&args.data)?;
    info!(
        periods = market.len(),
        instruments = market.all_instruments().len(),
        sources = market.sources().len(),
        "market data loaded"
    );

    let strategies = kinds
        .iter()
        .map(|kind| kind.build_with_signal(config.sizing, &config.signal))
        .collect::<apogee_traits::Result<Vec<Box<dyn Strategy>>>>()?;

    let evaluator = Evaluator::with_return_source(&market, config.return_source.clone());
    let reports: Vec<Report> = strategies
        .iter()
        .zip(evaluator.eval_many(&strategies))
        .map(|(strategy, run)| {
            let summary = run.and_then(|run| PerformanceSummary::from_run(&run, config.confidence));
            match summary {
                Ok(summary) => Report {
                    strategy: strategy.name().to_string(),
                    summary: Some(summary),
                    error: None,
                },
                Err(e) => Report {
                    strategy: strategy.name().to_string(),
                    summary: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    match args.format {
        OutputFormat::Text => print_text(&reports),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        bail!("{failed} of {} strategies failed", reports.len());
    }
    Ok(())
}

fn print_text(reports: &[Report]) {
    for report in reports {
        match (&report.summary, &report.error) {
            (Some(summary), _) => println!("{summary}\n"),
            (None, Some(error)) => println!("Backtest of {} failed: {error}\n", report.strategy),
            (None, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: BacktestArgs,
    }

    fn parse(argv: &[&str]) -> BacktestArgs {
        TestCli::try_parse_from(std::iter::once("apogee").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    const DATA: &str = "\
symbol,date,return,book_to_price
A,2020-01-31,0.00,0.9
A,2020-02-29,0.10,0.8
A,2020-03-31,-0.05,0.7
B,2020-01-31,0.00,0.5
B,2020-02-29,-0.02,0.5
B,2020-03-31,0.04,0.9
";

    #[test]
    fn test_flag_overrides() {
        let args = parse(&[
            "market",
            "--data",
            "x.csv",
            "--count",
            "3",
            "--confidence",
            "0.9",
            "--price-metric",
            "close",
        ]);
        let config = args.config().unwrap();
        assert_eq!(config.sizing, LegSizing::Count(3));
        assert_eq!(config.confidence, 0.9);
        assert_eq!(config.return_source, ReturnSource::prices("close"));
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        let argv = ["apogee", "market", "-d", "x.csv", "--selection", "0.1", "--count", "2"];
        assert!(TestCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_config_file_and_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "sizing": { "count": 2 }, "confidence": 0.8 }"#).unwrap();
        let path = path.to_string_lossy().into_owned();

        let config = parse(&["market", "-d", "x.csv", "-c", &path]).config().unwrap();
        assert_eq!(config.sizing, LegSizing::Count(2));
        assert_eq!(config.confidence, 0.8);

        let args = parse(&["market", "-d", "x.csv", "-c", &path, "--selection", "0.9"]);
        assert!(args.config().is_err());
    }

    #[test]
    fn test_unknown_strategies_skipped() {
        let args = parse(&["BestBPStrategy", "nonsense", "market", "-d", "x.csv"]);
        assert_eq!(args.kinds(), vec![StrategyKind::BestBp, StrategyKind::Market]);
    }

    #[test]
    fn test_repeated_strategies_run_once() {
        let args = parse(&["market", "best_bp", "market", "BestBPStrategy", "-d", "x.csv"]);
        assert_eq!(args.kinds(), vec![StrategyKind::Market, StrategyKind::BestBp]);
    }

    #[test]
    fn test_run_backtest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("market.csv");
        fs::write(&path, DATA).unwrap();
        let path = path.to_string_lossy().into_owned();

        let args = parse(&["market", "long_short_bp", "-d", &path, "-n", "1", "--format", "json"]);
        assert!(run_backtest(&args).is_ok());

        // two instruments cannot fill a 20% leg
        let args = parse(&["best_bp", "-d", &path]);
        assert!(run_backtest(&args).is_err());
    }
}
