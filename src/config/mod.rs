//! # Configuration
//!
//! Settings for the AWS parameter store client and for logging. Both can be
//! built in code, deserialized, or loaded from `SSM_SECRETS_*` environment
//! variables (a `.env` file in the working directory is honoured).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::secrets::{Result, SecretsError};

const ENV_REGION: &str = "SSM_SECRETS_REGION";
const ENV_ENDPOINT_URL: &str = "SSM_SECRETS_ENDPOINT_URL";
const ENV_PROFILE: &str = "SSM_SECRETS_PROFILE";
const ENV_PAGE_SIZE: &str = "SSM_SECRETS_PAGE_SIZE";
const ENV_LOG_LEVEL: &str = "SSM_SECRETS_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "SSM_SECRETS_LOG_FORMAT";

fn default_page_size() -> i32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parameter store client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SsmConfig {
    /// AWS region; falls back to the SDK's default provider chain when unset
    #[validate(length(min = 1, message = "Region cannot be empty"))]
    pub region: Option<String>,

    /// Custom endpoint, e.g. LocalStack
    #[validate(url(message = "Endpoint URL must be a valid URL"))]
    pub endpoint_url: Option<String>,

    /// Named profile from the shared AWS config files
    #[validate(length(min = 1, message = "Profile cannot be empty"))]
    pub profile: Option<String>,

    /// Parameters requested per `GetParametersByPath` page
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 10, message = "Page size must be between 1 and 10"))]
    pub page_size: i32,
}

impl Default for SsmConfig {
    fn default() -> Self {
        Self { region: None, endpoint_url: None, profile: None, page_size: default_page_size() }
    }
}

impl SsmConfig {
    /// Load configuration from environment variables
    ///
    /// Uses:
    /// - `SSM_SECRETS_REGION`
    /// - `SSM_SECRETS_ENDPOINT_URL`
    /// - `SSM_SECRETS_PROFILE`
    /// - `SSM_SECRETS_PAGE_SIZE` (default: 10)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let page_size = match std::env::var(ENV_PAGE_SIZE) {
            Ok(raw) => raw.parse::<i32>().map_err(|e| {
                SecretsError::config_error(format!("Invalid {}: '{}' ({})", ENV_PAGE_SIZE, raw, e))
            })?,
            Err(_) => default_page_size(),
        };

        let config = Self {
            region: non_empty_var(ENV_REGION),
            endpoint_url: non_empty_var(ENV_ENDPOINT_URL),
            profile: non_empty_var(ENV_PROFILE),
            page_size,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    #[serde(default)]
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: default_log_level(), json_logging: false }
    }
}

impl ObservabilityConfig {
    /// Load configuration from environment variables
    ///
    /// Uses:
    /// - `SSM_SECRETS_LOG_LEVEL` (default: "info")
    /// - `SSM_SECRETS_LOG_FORMAT`: `json` or `text` (default: "text")
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let json_logging = match std::env::var(ENV_LOG_FORMAT) {
            Ok(format) => match format.to_lowercase().as_str() {
                "json" => true,
                "text" | "" => false,
                other => {
                    return Err(SecretsError::config_error(format!(
                        "Invalid {}: '{}' (expected 'json' or 'text')",
                        ENV_LOG_FORMAT, other
                    )));
                }
            },
            Err(_) => false,
        };

        let config = Self {
            log_level: non_empty_var(ENV_LOG_LEVEL).unwrap_or_else(default_log_level),
            json_logging,
        };
        config.validate()?;
        Ok(config)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
