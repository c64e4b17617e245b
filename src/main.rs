//! TeamPulse - Employee Sentiment Analytics
//!
//! A CLI tool that loads precomputed sentiment feedback from a SQLite
//! database, classifies employees into engagement quadrants, and reports
//! aggregate statistics. With a Gemini API key it can also answer
//! questions grounded in the computed summary.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (database unreachable, config failure, etc.)
//!   2 - Database reachable but the feedback table holds no rows

mod ai;
mod cli;
mod config;
mod engine;
mod models;
mod report;
mod store;

use ai::GenAiClient;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use engine::{AnalyticsEngine, LoadOutcome};
use indicatif::ProgressBar;
use std::time::Duration;
use store::SqliteStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        match handle_init_config() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("\n❌ Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    init_logging(&args);

    info!("TeamPulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .teampulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".teampulse.toml");

    if path.exists() {
        eprintln!("⚠️  .teampulse.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .teampulse.toml")?;

    println!("✅ Created .teampulse.toml with default settings.");
    println!("   Edit it to customize the database path, table, and model.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the requested operation. Returns the process exit code.
async fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Build the engine with its explicit dependencies
    let store = SqliteStore::open(&config.database.path, &config.database.table)?;
    let ai = build_ai_client(&args, &config)?;
    let engine = AnalyticsEngine::new(Box::new(store), ai);

    // Load the record set
    if !args.quiet {
        println!("📥 Loading feedback from {}", config.database.path.display());
    }
    match engine.load()? {
        LoadOutcome::Loaded(count) => {
            if !args.quiet {
                println!("✅ Loaded {} employee records\n", count);
            }
        }
        LoadOutcome::Empty => {
            eprintln!(
                "⚠️  Table {:?} is reachable but holds no rows. Import feedback data first.",
                config.database.table
            );
            return Ok(2);
        }
    }

    if let Some(ref question) = args.ask {
        return run_ask(&engine, question, &args).await;
    }

    if args.employees {
        return run_employees(&engine, &args);
    }

    run_summary(&engine, &args, &config)
}

/// Print the analytics summary report.
fn run_summary(engine: &AnalyticsEngine, args: &Args, config: &Config) -> Result<i32> {
    let summary = engine.summary();

    let rendered = match args.format {
        OutputFormat::Json => report::generate_json_report(&summary)?,
        OutputFormat::Text => {
            report::generate_text_report(&summary, &config.database.path.display().to_string())
        }
    };

    write_result(args, &rendered)?;
    Ok(0)
}

/// List employee records, optionally filtered by exact quadrant label.
fn run_employees(engine: &AnalyticsEngine, args: &Args) -> Result<i32> {
    let records = engine.employees(args.quadrant.as_deref());
    info!(
        "Listing {} records (filter: {:?})",
        records.len(),
        args.quadrant
    );

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&records)?,
        OutputFormat::Text => report::generate_employee_listing(&records),
    };

    write_result(args, &rendered)?;
    Ok(0)
}

/// Forward a question, with the computed summary as context, to the AI
/// service. Failures degrade to a descriptive message, never an error.
async fn run_ask(engine: &AnalyticsEngine, question: &str, args: &Args) -> Result<i32> {
    let summary = engine.summary();
    let context = report::build_ai_context(&summary);
    debug!("AI context:\n{}", context);

    let spinner = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_message("Consulting the model...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let outcome = engine.analyze_with_ai(question, &context).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let answer = match outcome {
        Ok(answer) => answer,
        Err(e) => {
            warn!("AI analysis did not produce an answer: {}", e);
            report::render_ai_failure(&e)
        }
    };

    if !args.quiet {
        println!("🤖 {}\n", question);
    }
    write_result(args, &answer)?;
    Ok(0)
}

/// Print to stdout, or write to --output when given.
fn write_result(args: &Args, content: &str) -> Result<()> {
    match args.output {
        Some(ref path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !args.quiet {
                println!("✅ Saved to: {}", path.display());
            }
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .teampulse.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Build the AI client when an API key is available.
fn build_ai_client(args: &Args, config: &Config) -> Result<Option<GenAiClient>> {
    match args.api_key {
        Some(ref api_key) if !api_key.trim().is_empty() => {
            Ok(Some(GenAiClient::new(&config.model, api_key.clone())?))
        }
        _ => {
            info!("GEMINI_API_KEY not set; AI analysis disabled");
            Ok(None)
        }
    }
}
