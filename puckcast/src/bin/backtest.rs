use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Serialize;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info, warn};

use puckcast::calibration::{
    accuracy, accuracy_curve, calibration_curve, category_counts, confidence_bins, error_counts,
    grade_breakdown,
};
use puckcast::compare::{compare_model_vs_market, ModelMarketComparison};
use puckcast::config::BacktestConfig;
use puckcast::file::{ReadJsonFile, WriteJsonFile};
use puckcast::game::{self, GameOdds};
use puckcast::ledger::Ledger;
use puckcast::metrics::{calculate_roi_metrics, RoiMetrics};
use puckcast::print::{
    tabulate_accuracy, tabulate_bets, tabulate_calibration, tabulate_comparison,
    tabulate_confidence_bins, tabulate_counts, tabulate_grades, tabulate_metrics,
};
use puckcast::simulate::simulate;

const CALIBRATION_BINS: usize = 10;
const ACCURACY_BINS: usize = 20;
const ACCURACY_MIN_COUNT: usize = 5;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the games from
    file: Option<PathBuf>,

    /// JSON file to source the strategy parameters from
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// minimum edge for a fixed-stake bet
    #[clap(long)]
    edge_threshold: Option<f64>,

    /// fixed stake per bet
    #[clap(long)]
    bet_size: Option<f64>,

    /// fraction of the full Kelly stake to bet
    #[clap(long)]
    kelly_fraction: Option<f64>,

    /// starting bankroll for Kelly betting
    #[clap(long)]
    starting_bankroll: Option<f64>,

    /// number of bets to print from the start of each ledger
    #[clap(short = 'b', long, default_value_t = 0)]
    bets: usize,

    /// directory to export the ledgers and metrics to
    #[clap(short = 'o', long)]
    export_dir: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.file
            .as_ref()
            .ok_or(anyhow!("games file must be specified"))?;
        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<BacktestConfig> {
        let mut config = match &self.config {
            Some(path) => BacktestConfig::read_json_file(path)
                .with_context(|| format!("cannot read config from {}", path.display()))?,
            None => BacktestConfig::default(),
        };
        if let Some(edge_threshold) = self.edge_threshold {
            config.threshold.edge_threshold = edge_threshold;
        }
        if let Some(bet_size) = self.bet_size {
            config.threshold.bet_size = bet_size;
        }
        if let Some(kelly_fraction) = self.kelly_fraction {
            config.kelly.kelly_fraction = kelly_fraction;
        }
        if let Some(starting_bankroll) = self.starting_bankroll {
            config.kelly.starting_bankroll = starting_bankroll;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    config: &'a BacktestConfig,
    games: usize,
    rejected: usize,
    threshold: &'a RoiMetrics,
    kelly: &'a RoiMetrics,
    kelly_final_bankroll: f64,
    comparison: Option<&'a ModelMarketComparison>,
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");
    let config = args.load_config()?;
    debug!("config: {config:?}");

    let start_time = Instant::now();
    let file = args.file.as_ref().ok_or(anyhow!("games file must be specified"))?;
    let set = game::read_csv(file)?;
    for rejected in &set.rejected {
        warn!("rejected {rejected}");
    }
    info!(
        "loaded {} games from {} ({} rejected)",
        set.games.len(),
        file.display(),
        set.rejected.len()
    );
    let games = &set.games;

    let threshold_ledger = simulate(games, &config.threshold);
    let kelly_ledger = simulate(games, &config.kelly);
    let threshold_metrics =
        calculate_roi_metrics(&threshold_ledger.bets, Some(config.threshold.bet_size));
    let kelly_metrics = calculate_roi_metrics(&kelly_ledger.bets, None);
    let comparison = if games.is_empty() {
        None
    } else {
        Some(compare_model_vs_market(games)?)
    };
    let elapsed = start_time.elapsed();
    info!(
        "backtested {} games in {}s",
        games.len(),
        elapsed.as_millis() as f64 / 1_000.
    );

    let metrics_table = tabulate_metrics(&[
        ("Threshold", &threshold_metrics),
        ("Kelly", &kelly_metrics),
    ]);
    info!("strategies:\n{}", Console::default().render(&metrics_table));
    info!(
        "threshold profit: {:.2}, Kelly bankroll: {:.2} ({:+.2}%)",
        threshold_ledger.final_bankroll,
        kelly_ledger.final_bankroll,
        config.kelly.roi(kelly_ledger.final_bankroll)
    );

    if args.bets > 0 {
        for (label, ledger) in [("threshold", &threshold_ledger), ("Kelly", &kelly_ledger)] {
            let head = &ledger.bets[..usize::min(args.bets, ledger.bets.len())];
            info!(
                "{label} bets:\n{}",
                Console::default().render(&tabulate_bets(head))
            );
        }
    }

    if let Some(comparison) = &comparison {
        info!(
            "model vs market:\n{}",
            Console::default().render(&tabulate_comparison(comparison))
        );
        analyse(games);
    } else {
        warn!("no games to compare with the market");
    }

    if let Some(dir) = &args.export_dir {
        let report = Report {
            config: &config,
            games: games.len(),
            rejected: set.rejected.len(),
            threshold: &threshold_metrics,
            kelly: &kelly_metrics,
            kelly_final_bankroll: kelly_ledger.final_bankroll,
            comparison: comparison.as_ref(),
        };
        export(dir, &threshold_ledger, &kelly_ledger, &report)?;
    }

    Ok(())
}

fn analyse(games: &[GameOdds]) {
    info!("model accuracy: {:.1}%", accuracy(games) * 100.);
    info!(
        "accuracy by confidence:\n{}",
        Console::default().render(&tabulate_confidence_bins(&confidence_bins(games)))
    );
    info!(
        "calibration:\n{}",
        Console::default().render(&tabulate_calibration(&calibration_curve(
            games,
            CALIBRATION_BINS
        )))
    );
    info!(
        "accuracy by probability:\n{}",
        Console::default().render(&tabulate_accuracy(&accuracy_curve(
            games,
            ACCURACY_BINS,
            ACCURACY_MIN_COUNT
        )))
    );
    info!(
        "outcomes:\n{}",
        Console::default().render(&tabulate_counts("Outcome", &category_counts(games)))
    );
    info!(
        "errors:\n{}",
        Console::default().render(&tabulate_counts("Error", &error_counts(games)))
    );
    info!(
        "accuracy by grade:\n{}",
        Console::default().render(&tabulate_grades(&grade_breakdown(games)))
    );
}

fn export(
    dir: &Path,
    threshold_ledger: &Ledger,
    kelly_ledger: &Ledger,
    report: &Report,
) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    let threshold_path = dir.join("threshold_bets.csv");
    threshold_ledger.write_csv(&threshold_path)?;
    let kelly_path = dir.join("kelly_bets.csv");
    kelly_ledger.write_csv(&kelly_path)?;
    let report_path = dir.join("metrics.json");
    report.write_json_file(&report_path)?;
    info!(
        "exported {}, {} and {}",
        threshold_path.display(),
        kelly_path.display(),
        report_path.display()
    );
    Ok(())
}
