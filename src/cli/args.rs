use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::analyzer::llm_client::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS};
use crate::config::{AppConfig, DEFAULT_BIND};
use crate::providers::ProviderId;

#[derive(Parser, Debug)]
#[command(name = "brandcheck")]
#[command(about = "Brand alignment analysis for marketing copy using LLMs")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Maximum time for each LLM request in seconds (10-300)
    #[arg(
        short = 't',
        long,
        global = true,
        env = "BRANDCHECK_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = validate_timeout
    )]
    pub timeout: u64,

    /// Brand guideline JSON document (defaults to the built-in guidelines)
    #[arg(short = 'g', long, global = true, env = "BRANDCHECK_GUIDELINES")]
    pub guidelines: Option<PathBuf>,

    /// Enable verbose output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Enable debug output including provider traffic
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(short = 'b', long, env = "BRANDCHECK_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,
    },

    /// Analyze content read from a file or stdin
    Analyze(AnalyzeArgs),

    /// List providers and whether their API keys are set
    Providers,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Marketing channel the content is written for (e.g. social, blogs)
    #[arg(short = 'p', long)]
    pub platform: String,

    /// LLM provider (anthropic, openai, gemini)
    #[arg(long, default_value = "anthropic", value_parser = parse_provider)]
    pub provider: ProviderId,

    /// Read content from this file instead of stdin
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Also generate rewrite recommendations
    #[arg(short = 'r', long)]
    pub recommend: bool,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn app_config(&self) -> AppConfig {
        let bind = match &self.command {
            Command::Serve { bind } => *bind,
            _ => AppConfig::default().bind,
        };

        AppConfig {
            timeout: Duration::from_secs(self.timeout),
            bind,
            guidelines_path: self.guidelines.clone(),
        }
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.parse()
        .map_err(|_| "Timeout must be a number")?;

    if (MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout) {
        Ok(timeout)
    } else {
        Err(format!(
            "Timeout must be between {} and {} seconds",
            MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS
        ))
    }
}

fn parse_provider(s: &str) -> Result<ProviderId, String> {
    s.parse::<ProviderId>().map_err(|e| e.to_string())
}
