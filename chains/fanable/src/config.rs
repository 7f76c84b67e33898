use config::{Config, Environment, File};
use core_logic::{ConfigError, RetryPolicy, ValidationError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://bqe6ojyqj7.execute-api.eu-central-1.amazonaws.com";

/// Immutable run configuration. Every delay, bound and path the bot uses
/// lives here so tests can override them without global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanableConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub max_timestamp_retries: u32,
    pub timestamp_retry_delay_ms: u64,
    pub social_task_delay_ms: u64,
    pub post_wallet_delay_ms: u64,
    pub iteration_delay_ms: u64,
    pub proxy_file: String,
    pub addresses_file: String,
    pub private_keys_file: String,
    pub log_dir: String,
}

impl Default for FanableConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: 30_000,
            max_timestamp_retries: 5,
            timestamp_retry_delay_ms: 1_500,
            social_task_delay_ms: 700,
            post_wallet_delay_ms: 300,
            iteration_delay_ms: 5_000,
            proxy_file: "config/proxy.txt".to_string(),
            addresses_file: "config/addresses.txt".to_string(),
            private_keys_file: "config/private_keys.txt".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

impl FanableConfig {
    /// Defaults, then the optional TOML file at `path`, then `FANABLE_*` env vars.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let load_err = |e: config::ConfigError| ConfigError::Load {
            reason: e.to_string(),
        };

        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default()).map_err(load_err)?)
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("FANABLE").try_parsing(true))
            .build()
            .map_err(load_err)?;

        let config: Self = settings.try_deserialize().map_err(load_err)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        if self.request_timeout_ms == 0 {
            return Err(invalid("request_timeout_ms", "must be greater than zero"));
        }
        if self.max_timestamp_retries == 0 {
            return Err(invalid("max_timestamp_retries", "must be at least 1"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn timestamp_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_timestamp_retries, self.timestamp_retry_delay_ms)
    }

    pub fn social_task_delay(&self) -> Duration {
        Duration::from_millis(self.social_task_delay_ms)
    }

    pub fn post_wallet_delay(&self) -> Duration {
        Duration::from_millis(self.post_wallet_delay_ms)
    }

    pub fn iteration_delay(&self) -> Duration {
        Duration::from_millis(self.iteration_delay_ms)
    }
}

/// Validated operator input for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub iterations: u32,
    pub referral_code: String,
}

impl RunParams {
    pub fn parse(count_input: &str, referral_code: &str) -> Result<Self, ValidationError> {
        let iterations = count_input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ValidationError::InvalidIterationCount {
                input: count_input.trim().to_string(),
            })?;

        let referral_code = referral_code.trim();
        if referral_code.is_empty() {
            return Err(ValidationError::EmptyReferralCode);
        }

        Ok(Self {
            iterations,
            referral_code: referral_code.to_string(),
        })
    }
}
