//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::config_catalog::ConfigCatalog;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::bucket::SELECTION_SEED;
use crate::domain::config_validation::validate_config;
use crate::domain::error::CoinbucketError;
use crate::domain::pipeline::{Pipeline, PipelineResult};
use crate::domain::router::{Route, route_query};
use crate::domain::signal::{DEFAULT_SIGNAL_WINDOW, DEFAULT_THRESHOLD_PCT, momentum_signal};
use crate::domain::universe::get_universe;
use crate::ports::catalog_port::SymbolCatalogPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_PRICE_DIR: &str = "data";
pub const UNHANDLED_EXIT_CODE: u8 = 6;

#[derive(Parser, Debug)]
#[command(name = "coinbucket", about = "Risk-tiered coin bucket allocator and backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build and backtest buckets from a preference statement
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Route a free-text query; only bucket/portfolio queries are answered
    Ask {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Print the resolved universe
    Universe {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the latest close for a symbol
    Price {
        #[arg(long)]
        symbol: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Classify recent momentum for a symbol
    Signal {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        window: Option<usize>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            output,
            query,
        } => run_pipeline(config.as_ref(), output.as_ref(), &query.join(" ")),
        Command::Ask {
            config,
            output,
            query,
        } => run_ask(config.as_ref(), output.as_ref(), &query.join(" ")),
        Command::Universe { config } => run_universe(config.as_ref()),
        Command::Price { symbol, config } => run_price(&symbol, config.as_ref()),
        Command::Signal {
            symbol,
            window,
            config,
        } => run_signal(&symbol, window, config.as_ref()),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Values resolved from the config file, with defaults for absent keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub price_dir: PathBuf,
    pub live_catalog: bool,
    pub seed: u64,
    pub signal_window: usize,
    pub threshold_pct: f64,
    pub output: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            price_dir: PathBuf::from(DEFAULT_PRICE_DIR),
            live_catalog: true,
            seed: SELECTION_SEED,
            signal_window: DEFAULT_SIGNAL_WINDOW,
            threshold_pct: DEFAULT_THRESHOLD_PCT,
            output: None,
        }
    }
}

pub fn build_settings(config: Option<&dyn ConfigPort>) -> Result<Settings, CoinbucketError> {
    let Some(config) = config else {
        return Ok(Settings::default());
    };
    validate_config(config)?;

    let defaults = Settings::default();
    let seed = match config.get_string("buckets", "seed") {
        Some(s) => s.trim().parse().map_err(|_| CoinbucketError::ConfigInvalid {
            section: "buckets".into(),
            key: "seed".into(),
            reason: "seed must be a non-negative integer".into(),
        })?,
        None => defaults.seed,
    };

    Ok(Settings {
        price_dir: config
            .get_string("data", "price_dir")
            .map(PathBuf::from)
            .unwrap_or(defaults.price_dir),
        live_catalog: config.get_bool("data", "live_catalog", defaults.live_catalog),
        seed,
        signal_window: config.get_int("signal", "window", defaults.signal_window as i64) as usize,
        threshold_pct: config.get_double("signal", "threshold_pct", defaults.threshold_pct),
        output: config.get_string("report", "output").map(PathBuf::from),
    })
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Adapters wired from one config file.
pub struct AppContext {
    pub settings: Settings,
    pub prices: CsvAdapter,
    config_catalog: Option<ConfigCatalog>,
}

impl AppContext {
    pub fn from_config(config: Option<&dyn ConfigPort>) -> Result<Self, CoinbucketError> {
        let settings = build_settings(config)?;
        Ok(Self {
            prices: CsvAdapter::new(settings.price_dir.clone()),
            config_catalog: config.and_then(ConfigCatalog::from_config),
            settings,
        })
    }

    /// Configured symbol list first, then the price directory listing when
    /// `live_catalog` is on. `None` leaves the universe on its fallback list.
    pub fn catalog(&self) -> Option<&dyn SymbolCatalogPort> {
        match &self.config_catalog {
            Some(catalog) => Some(catalog as &dyn SymbolCatalogPort),
            None if self.settings.live_catalog => Some(&self.prices as &dyn SymbolCatalogPort),
            None => None,
        }
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(self.catalog(), &self.prices).with_seed(self.settings.seed)
    }
}

fn load_context(config_path: Option<&PathBuf>) -> Result<AppContext, ExitCode> {
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            Some(load_config(path)?)
        }
        None => None,
    };

    AppContext::from_config(config.as_ref().map(|c| c as &dyn ConfigPort)).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn print_summary(result: &PipelineResult) {
    let prefs = &result.preferences;
    eprintln!("\n=== Preferences ===");
    eprintln!("Risk:             {}", prefs.risk);
    eprintln!("Coins per bucket: {}", prefs.num_coins);
    eprintln!("Horizon:          {} days", prefs.horizon_days);

    eprintln!("\n=== Bucket Results ===");
    for bucket in &result.evaluation {
        let marker = if bucket.risk == prefs.risk { " *" } else { "" };
        eprintln!(
            "  {}{}:  {:+.2}%",
            bucket.name, marker, bucket.total_return_pct
        );
        for coin in &bucket.coins {
            eprintln!(
                "    {:<8} {:>6.2}%  {:+.2}%",
                coin.symbol,
                coin.weight * 100.0,
                coin.return_pct
            );
        }
    }
}

fn emit_result(
    result: &PipelineResult,
    output_path: Option<&PathBuf>,
    settings: &Settings,
) -> ExitCode {
    print_summary(result);

    match output_path.or(settings.output.as_ref()) {
        Some(path) => match JsonReportAdapter.write(result, &path.display().to_string()) {
            Ok(()) => {
                eprintln!("\nResult written to: {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        },
        None => match JsonReportAdapter::render(result) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        },
    }
}

fn run_pipeline(config_path: Option<&PathBuf>, output_path: Option<&PathBuf>, text: &str) -> ExitCode {
    let ctx = match load_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    eprintln!("Running bucket pipeline");
    let result = ctx.pipeline().run(text);
    emit_result(&result, output_path, &ctx.settings)
}

fn run_ask(config_path: Option<&PathBuf>, output_path: Option<&PathBuf>, text: &str) -> ExitCode {
    let ctx = match load_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match route_query(text, &ctx.pipeline()) {
        Route::Bucket(result) => emit_result(&result, output_path, &ctx.settings),
        Route::Unhandled => {
            eprintln!("Not a bucket or portfolio query; nothing to answer here.");
            ExitCode::from(UNHANDLED_EXIT_CODE)
        }
    }
}

fn run_universe(config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match load_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let universe = get_universe(ctx.catalog());
    for symbol in universe.symbols() {
        println!("{}", symbol);
    }
    eprintln!("{} symbols in universe", universe.len());
    ExitCode::SUCCESS
}

fn run_price(symbol: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match load_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = symbol.to_lowercase();
    match ctx.prices.latest_price(&symbol) {
        Ok(price) => {
            println!("{} {:.2}", symbol, price);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_signal(symbol: &str, window: Option<usize>, config_path: Option<&PathBuf>) -> ExitCode {
    let ctx = match load_context(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let symbol = symbol.to_lowercase();
    let window = window.unwrap_or(ctx.settings.signal_window);

    let signal = ctx
        .prices
        .load_history(&symbol)
        .and_then(|series| momentum_signal(&series, window, ctx.settings.threshold_pct));

    match signal {
        Ok(signal) => {
            println!(
                "{} {} {:+.2}% over {} rows: {}",
                signal.symbol,
                signal.stance,
                signal.pct_change,
                window,
                signal.stance.advice()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_settings(Some(&adapter as &dyn ConfigPort)) {
        Ok(settings) => {
            eprintln!("  price_dir:    {}", settings.price_dir.display());
            eprintln!("  live_catalog: {}", settings.live_catalog);
            eprintln!("  seed:         {}", settings.seed);
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
