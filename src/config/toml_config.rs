use crate::adapters::completion::{
    DEFAULT_COMPLETION_ENDPOINT, DEFAULT_COMPLETION_MODEL, DEFAULT_MAX_TOKENS,
};
use crate::adapters::deck::DEFAULT_DECK_ENDPOINT;
use crate::config::{
    ttl_from_secs, validate_provider, CliConfig, DEFAULT_INTERPRETATION_TTL_SECS, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::core::ConfigProvider;
use crate::utils::error::{Result, TarotError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub deck: DeckConfig,
    pub completion: CompletionConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub endpoint: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DECK_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub testing: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            testing: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub interpretation_ttl_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            interpretation_ttl_secs: DEFAULT_INTERPRETATION_TTL_SECS,
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TarotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Layers `API_KEY` and `TESTING` from the command line or environment
    /// over the file. A key given there replaces the file's key; testing
    /// mode can be switched on but not off.
    pub fn with_cli_overrides(mut self, cli: &CliConfig) -> Self {
        if let Some(api_key) = cli.api_key() {
            self.completion.api_key = Some(api_key.to_string());
        }
        if cli.testing_mode() {
            self.completion.testing = true;
        }
        self
    }

    /// Replaces `${VAR}` with the environment value; unset variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn host(&self) -> &str {
        &self.server.host
    }

    fn port(&self) -> u16 {
        self.server.port
    }

    fn api_key(&self) -> Option<&str> {
        self.completion
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && !env_var_pattern().is_match(key))
    }

    fn testing_mode(&self) -> bool {
        self.completion.testing
    }

    fn deck_endpoint(&self) -> &str {
        &self.deck.endpoint
    }

    fn completion_endpoint(&self) -> &str {
        &self.completion.endpoint
    }

    fn completion_model(&self) -> &str {
        &self.completion.model
    }

    fn max_tokens(&self) -> u32 {
        self.completion.max_tokens
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    fn interpretation_ttl(&self) -> Option<Duration> {
        ttl_from_secs(self.store.interpretation_ttl_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 9090
request_timeout_secs = 30

[deck]
endpoint = "https://tarotapi.dev/api/v1/cards"

[completion]
api_key = "sk-from-file"
model = "gpt-3.5-turbo-instruct"
max_tokens = 400

[store]
interpretation_ttl_secs = 600
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port(), 9090);
        assert_eq!(config.api_key(), Some("sk-from-file"));
        assert_eq!(config.max_tokens(), 400);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.interpretation_ttl(), Some(Duration::from_secs(600)));
        assert!(!config.testing_mode());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = TomlConfig::from_toml_str("[completion]\ntesting = true\n").unwrap();

        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.deck_endpoint(), DEFAULT_DECK_ENDPOINT);
        assert_eq!(config.completion_model(), DEFAULT_COMPLETION_MODEL);
        assert!(config.testing_mode());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TAROT_TEST_COMPLETION_KEY", "sk-from-env");

        let toml_content = r#"
[completion]
api_key = "${TAROT_TEST_COMPLETION_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("sk-from-env"));

        std::env::remove_var("TAROT_TEST_COMPLETION_KEY");
    }

    #[test]
    fn test_unresolved_api_key_counts_as_missing() {
        let toml_content = r#"
[completion]
api_key = "${TAROT_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), None);
        assert!(matches!(
            config.validate(),
            Err(TarotError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = TomlConfig::from_toml_str("[server\nport = ");
        assert!(matches!(
            result,
            Err(TarotError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_cli_overrides_api_key_and_testing() {
        let file_config = TomlConfig::from_toml_str(
            "[completion]\napi_key = \"sk-from-file\"\ntesting = false\n",
        )
        .unwrap();
        let cli = CliConfig::try_parse_from([
            "tarot-reader",
            "--api-key",
            "sk-from-env",
            "--testing",
            "True",
        ])
        .unwrap();

        let config = file_config.with_cli_overrides(&cli);

        assert_eq!(config.api_key(), Some("sk-from-env"));
        assert!(config.testing_mode());
    }

    #[test]
    fn test_cli_without_overrides_keeps_file_values() {
        let file_config = TomlConfig::from_toml_str(
            "[completion]\napi_key = \"sk-from-file\"\ntesting = true\n",
        )
        .unwrap();
        let mut cli = CliConfig::try_parse_from(["tarot-reader"]).unwrap();
        cli.api_key = None;
        cli.testing = false;

        let config = file_config.with_cli_overrides(&cli);

        assert_eq!(config.api_key(), Some("sk-from-file"));
        assert!(config.testing_mode());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nport = 8181\n\n[completion]\ntesting = true\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.port(), 8181);
        assert!(config.testing_mode());
    }
}
