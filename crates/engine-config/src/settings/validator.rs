use crate::settings::{error::SettingsError, import::ImportSettings};
use tracing::{info, warn};

const LARGE_PREVIEW_LIMIT: usize = 1_000;

/// Validates import settings before a session is created.
pub struct SettingsValidator {
    submitting: bool,
}

impl SettingsValidator {
    /// `submitting` adds the checks that only matter when the backend will
    /// be called.
    pub fn new(submitting: bool) -> Self {
        Self { submitting }
    }

    pub fn validate(&self, settings: &ImportSettings) -> Result<(), SettingsError> {
        let mut errors: Vec<String> = Vec::new();

        self.validate_preview_limit(settings, &mut errors);
        self.validate_timeout(settings, &mut errors);
        self.validate_api_url(settings, &mut errors);

        if !errors.is_empty() {
            return Err(SettingsError::ValidationFailed(errors));
        }

        if self.submitting && settings.auth_token.is_none() {
            warn!("No bearer token configured; requests will be sent unauthenticated");
        }

        info!(
            "Settings validated: preview_limit={}, timeout={}s, strategy={}",
            settings.preview_limit,
            settings.timeout_secs,
            settings
                .strategy
                .map(|s| s.to_string())
                .unwrap_or_else(|| "per-resource".to_string())
        );
        Ok(())
    }

    fn validate_preview_limit(&self, settings: &ImportSettings, errors: &mut Vec<String>) {
        if settings.preview_limit == 0 {
            errors.push("preview limit must be at least 1".to_string());
        } else if settings.preview_limit > LARGE_PREVIEW_LIMIT {
            warn!(
                "Preview limit {} is very large, output may be hard to review",
                settings.preview_limit
            );
        }
    }

    fn validate_timeout(&self, settings: &ImportSettings, errors: &mut Vec<String>) {
        if settings.timeout_secs == 0 {
            errors.push("request timeout must be at least 1 second".to_string());
        }
    }

    fn validate_api_url(&self, settings: &ImportSettings, errors: &mut Vec<String>) {
        match settings.api_url.as_deref() {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                errors.push(format!("API URL must start with http:// or https://: {url}"));
            }
            None if self.submitting => errors.push(SettingsError::MissingApiUrl.to_string()),
            _ => {}
        }
    }
}
