use clap::Parser;
use poker_policy::config::PolicyConfig;
use poker_policy::engine::{Mode, PolicyEngine};
use poker_policy::logging::init_logging;
use poker_policy::params::FileSource;
use poker_policy::stream;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

/// Decide betting actions for game states read from stdin, one JSON document per line.
#[derive(Debug, Parser)]
#[command(name = "poker-policy", version)]
struct Cli {
    /// TOML config file (overrides POKER_POLICY_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Parameter document for the policy network
    #[arg(long)]
    model: Option<PathBuf>,
    /// Seed for the fallback strategy
    #[arg(long)]
    seed: Option<u64>,
}

fn resolve(cli: &Cli) -> Result<PolicyConfig, poker_policy::config::ConfigError> {
    let mut cfg = match &cli.config {
        Some(path) => PolicyConfig::load_with(Some(path.as_path()), |key| std::env::var(key).ok())?,
        None => PolicyConfig::load()?,
    };
    if cli.model.is_some() {
        cfg.model_path = cli.model.clone();
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    Ok(cfg)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cfg = match resolve(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("poker-policy: {e}");
            return ExitCode::from(2);
        }
    };
    init_logging(&cfg.log_level);

    let mut engine = PolicyEngine::with_seed(cfg.seed);
    match &cfg.model_path {
        Some(path) => {
            if engine.initialize(&FileSource::new(path)) == Mode::FallbackOnly {
                tracing::warn!("continuing with the fallback strategy");
            }
        }
        None => tracing::warn!("no model configured, every decision uses the fallback strategy"),
    }

    if io::stdin().is_terminal() {
        eprintln!(
            "poker-policy {}: reading game states from stdin, one JSON object per line",
            poker_policy::VERSION
        );
    }
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    match stream::run(&mut engine, stdin, stdout) {
        Ok(stats) => {
            tracing::info!(decided = stats.decided, skipped = stats.skipped, "input exhausted");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "i/o failure");
            ExitCode::FAILURE
        }
    }
}
