pub mod toml_config;

use crate::adapters::completion::{
    DEFAULT_COMPLETION_ENDPOINT, DEFAULT_COMPLETION_MODEL, DEFAULT_MAX_TOKENS,
};
use crate::adapters::deck::DEFAULT_DECK_ENDPOINT;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8082;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_INTERPRETATION_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Parser)]
#[command(name = "tarot-reader")]
#[command(about = "Three-card tarot readings with background interpretations")]
pub struct CliConfig {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(
        long,
        env = "TESTING",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Store a fixed placeholder instead of calling the completion source"
    )]
    pub testing: bool,

    #[arg(long, env = "DECK_ENDPOINT", default_value = DEFAULT_DECK_ENDPOINT)]
    pub deck_endpoint: String,

    #[arg(long, env = "COMPLETION_ENDPOINT", default_value = DEFAULT_COMPLETION_ENDPOINT)]
    pub completion_endpoint: String,

    #[arg(long, env = "COMPLETION_MODEL", default_value = DEFAULT_COMPLETION_MODEL)]
    pub completion_model: String,

    #[arg(long, env = "MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(
        long,
        env = "INTERPRETATION_TTL_SECS",
        default_value_t = DEFAULT_INTERPRETATION_TTL_SECS,
        help = "Seconds to keep interpretations, 0 keeps them for the process lifetime"
    )]
    pub interpretation_ttl_secs: u64,

    #[arg(
        short,
        long,
        help = "Path to a TOML configuration file; API_KEY and TESTING still apply on top of it"
    )]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    fn testing_mode(&self) -> bool {
        self.testing
    }

    fn deck_endpoint(&self) -> &str {
        &self.deck_endpoint
    }

    fn completion_endpoint(&self) -> &str {
        &self.completion_endpoint
    }

    fn completion_model(&self) -> &str {
        &self.completion_model
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn interpretation_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.interpretation_ttl_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

pub(crate) fn ttl_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_non_empty_string("host", config.host())?;
    validation::validate_url("deck_endpoint", config.deck_endpoint())?;
    validation::validate_positive_number(
        "request_timeout_secs",
        config.request_timeout().as_secs(),
        1,
    )?;

    // The completion source is only contacted outside testing mode.
    if !config.testing_mode() {
        validation::validate_required_field("API_KEY", &config.api_key())?;
        validation::validate_url("completion_endpoint", config.completion_endpoint())?;
        validation::validate_non_empty_string("completion_model", config.completion_model())?;
        validation::validate_positive_number("max_tokens", u64::from(config.max_tokens()), 1)?;
    }

    Ok(())
}
