use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use puckcast::game;
use puckcast::metrics::calculate_roi_metrics;
use puckcast::print::tabulate_sweep;
use puckcast::simulate::{sweep_kelly_fractions, FractionalKelly};

const DEFAULT_FRACTIONS: [f64; 6] = [0.05, 0.1, 0.25, 0.5, 0.75, 1.0];

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the games from
    file: Option<PathBuf>,

    /// comma-separated Kelly fractions to evaluate
    #[clap(short = 'f', long, value_delimiter = ',', default_values_t = DEFAULT_FRACTIONS)]
    fractions: Vec<f64>,

    /// starting bankroll for every run
    #[clap(short = 's', long, default_value_t = 10_000.0)]
    starting_bankroll: f64,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.file
            .as_ref()
            .ok_or(anyhow!("games file must be specified"))?;
        if self.fractions.is_empty() {
            bail!("at least one Kelly fraction must be specified");
        }
        for &kelly_fraction in &self.fractions {
            FractionalKelly {
                kelly_fraction,
                starting_bankroll: self.starting_bankroll,
            }
            .validate()?;
        }
        Ok(())
    }
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

    let file = args.file.as_ref().ok_or(anyhow!("games file must be specified"))?;
    let set = game::read_csv(file)?;
    info!(
        "loaded {} games from {} ({} rejected)",
        set.games.len(),
        file.display(),
        set.rejected.len()
    );

    let start_time = Instant::now();
    let results: Vec<_> = sweep_kelly_fractions(&set.games, &args.fractions, args.starting_bankroll)
        .into_iter()
        .map(|(staking, ledger)| {
            let metrics = calculate_roi_metrics(&ledger.bets, None);
            (staking, metrics, ledger.final_bankroll)
        })
        .collect();
    let elapsed = start_time.elapsed();
    info!(
        "swept {} fractions in {}s",
        results.len(),
        elapsed.as_millis() as f64 / 1_000.
    );

    info!(
        "Kelly fractions:\n{}",
        Console::default().render(&tabulate_sweep(&results))
    );

    if let Some((staking, metrics, final_bankroll)) = results
        .iter()
        .max_by(|(_, _, a), (_, _, b)| a.total_cmp(b))
    {
        info!(
            "best fraction: {} (final bankroll {final_bankroll:.2}, max drawdown {:.2})",
            staking.kelly_fraction, metrics.max_drawdown
        );
    }

    Ok(())
}
