use crate::{env::EnvManager, settings::error::SettingsError};
use model::{execution::strategy::SubmitStrategy, schema::resource::Resource};
use serde::Serialize;
use std::{str::FromStr, time::Duration};

pub const ENV_API_URL: &str = "AIMS_API_URL";
pub const ENV_AUTH_TOKEN: &str = "AIMS_AUTH_TOKEN";
pub const ENV_PREVIEW_LIMIT: &str = "AIMS_PREVIEW_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "AIMS_REQUEST_TIMEOUT_SECS";
pub const ENV_STRATEGY: &str = "AIMS_SUBMIT_STRATEGY";

pub const DEFAULT_PREVIEW_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct ImportSettings {
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    pub preview_limit: usize,
    pub timeout_secs: u64,
    /// Overrides every resource's default strategy when set.
    pub strategy: Option<SubmitStrategy>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            api_url: None,
            auth_token: None,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            strategy: None,
        }
    }
}

impl ImportSettings {
    pub fn from_env(env: &EnvManager) -> Result<Self, SettingsError> {
        let defaults = ImportSettings::default();
        Ok(ImportSettings {
            api_url: env.get(ENV_API_URL).map(str::to_string),
            auth_token: env.get(ENV_AUTH_TOKEN).map(str::to_string),
            preview_limit: parse_var(env, ENV_PREVIEW_LIMIT)?.unwrap_or(defaults.preview_limit),
            timeout_secs: parse_var(env, ENV_TIMEOUT_SECS)?.unwrap_or(defaults.timeout_secs),
            strategy: parse_var(env, ENV_STRATEGY)?,
        })
    }

    pub fn strategy_for(&self, resource: Resource) -> SubmitStrategy {
        self.strategy.unwrap_or_else(|| resource.default_strategy())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn require_api_url(&self) -> Result<&str, SettingsError> {
        self.api_url.as_deref().ok_or(SettingsError::MissingApiUrl)
    }
}

fn parse_var<T>(env: &EnvManager, key: &str) -> Result<Option<T>, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env.get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| SettingsError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}
