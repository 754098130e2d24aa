//! Configuration types, read from the environment.

use crate::error::ConfigError;

/// Default generation endpoint.
pub const DEFAULT_LLM_URL: &str = "https://llm.neorains.com/api/generate";
/// Default model name sent with every request.
pub const DEFAULT_MODEL: &str = "llama3.1";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.9;
/// Default port for the REST front end.
pub const DEFAULT_PORT: u16 = 8080;

/// Settings for the text-generation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Full URL of the generate endpoint.
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationConfig {
    /// Load from `ONBOARD_ASSIST_LLM_URL`, `ONBOARD_ASSIST_MODEL` and
    /// `ONBOARD_ASSIST_TEMPERATURE`, falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("ONBOARD_ASSIST_LLM_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LLM_URL.to_string());

        let model = lookup("ONBOARD_ASSIST_MODEL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = match lookup("ONBOARD_ASSIST_TEMPERATURE") {
            Some(raw) => parse_temperature(&raw)?,
            None => DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            endpoint,
            model,
            temperature,
        })
    }
}

fn parse_temperature(raw: &str) -> Result<f32, ConfigError> {
    let value: f32 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: "ONBOARD_ASSIST_TEMPERATURE".to_string(),
        message: format!("{raw:?} is not a number"),
    })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidValue {
            key: "ONBOARD_ASSIST_TEMPERATURE".to_string(),
            message: format!("{value} must be a non-negative number"),
        });
    }
    Ok(value)
}

/// Which front end the binary starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Interactive stdin/stdout session.
    Cli,
    /// JSON REST API.
    Serve,
}

/// Settings for the binary's front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub mode: RunMode,
    pub port: u16,
}

impl ServerConfig {
    /// Load from `ONBOARD_ASSIST_MODE` (`cli` | `serve`) and
    /// `ONBOARD_ASSIST_PORT`. A `--serve` argument overrides the mode.
    pub fn from_env(args: &[String]) -> Self {
        let env_mode = std::env::var("ONBOARD_ASSIST_MODE").unwrap_or_default();
        let mode = if args.iter().any(|a| a == "--serve") || env_mode.eq_ignore_ascii_case("serve")
        {
            RunMode::Serve
        } else {
            RunMode::Cli
        };

        let port: u16 = std::env::var("ONBOARD_ASSIST_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { mode, port }
    }
}
