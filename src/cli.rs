//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// TeamPulse - employee sentiment analytics with AI-assisted insights
///
/// Load precomputed sentiment feedback from a SQLite database, classify
/// employees into engagement quadrants, and report aggregate statistics.
/// Optionally forward a question, with a computed summary as context, to
/// the Gemini API.
///
/// Examples:
///   teampulse --db sentiment_reports.db
///   teampulse --db sentiment_reports.db --format json --output summary.json
///   teampulse --db sentiment_reports.db --employees --quadrant "At Risk"
///   teampulse --db sentiment_reports.db --ask "Which roles need attention?"
///   teampulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the SQLite feedback database
    ///
    /// Defaults to the path in .teampulse.toml (teampulse.db).
    #[arg(short, long, value_name = "FILE", env = "TEAMPULSE_DB")]
    pub db: Option<PathBuf>,

    /// Name of the feedback table to read
    #[arg(long, value_name = "TABLE", env = "TEAMPULSE_TABLE")]
    pub table: Option<String>,

    /// Gemini model to use for --ask
    ///
    /// Can also be set via TEAMPULSE_MODEL env var or .teampulse.toml config.
    #[arg(short, long, default_value = "gemini-2.0-flash", env = "TEAMPULSE_MODEL")]
    pub model: String,

    /// Gemini API base URL
    #[arg(
        long,
        default_value = "https://generativelanguage.googleapis.com/v1beta",
        env = "GEMINI_API_BASE"
    )]
    pub api_base: String,

    /// Gemini API key
    ///
    /// Without a key the AI path is disabled; everything else still works.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// List employee records instead of printing the summary
    #[arg(long)]
    pub employees: bool,

    /// Only list employees whose quadrant equals this label exactly
    ///
    /// Matching is case-sensitive, e.g. --quadrant "At Risk".
    #[arg(long, value_name = "LABEL", requires = "employees")]
    pub quadrant: Option<String>,

    /// Ask the AI a question about the loaded data
    #[arg(long, value_name = "QUESTION", conflicts_with = "employees")]
    pub ask: Option<String>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .teampulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Temperature for AI responses (0.0 - 2.0)
    #[arg(long, default_value = "0.7")]
    pub temperature: f32,

    /// Generation budget in output tokens for AI responses
    #[arg(long, value_name = "TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Request timeout in seconds for the AI service
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Generate a default .teampulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for reports and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate temperature range
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("Temperature must be between 0.0 and 2.0".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        // Validate the question if provided
        if let Some(ref question) = self.ask {
            if question.trim().is_empty() {
                return Err("The --ask question must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            db: Some(PathBuf::from("test.db")),
            table: None,
            model: "gemini-2.0-flash".to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            employees: false,
            quadrant: None,
            ask: None,
            format: OutputFormat::Text,
            output: None,
            config: None,
            verbose: false,
            quiet: false,
            temperature: 0.7,
            max_output_tokens: None,
            timeout: None,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_temperature_range() {
        let mut args = make_args();
        args.temperature = 2.5;
        assert!(args.validate().is_err());

        args.temperature = -0.1;
        assert!(args.validate().is_err());

        args.temperature = 0.0;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_question() {
        let mut args = make_args();
        args.ask = Some("   ".to_string());
        assert!(args.validate().is_err());

        args.ask = Some("Which roles need attention?".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
