use color_eyre::eyre::{Result, WrapErr};
use std::env;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub github_api_url: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub host: IpAddr,
    pub port: u16,
    pub search_timeout_secs: u64,
    /// Per-call budget for the generative-text provider
    pub enrichment_timeout_secs: u64,
    pub otlp_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            gemini_api_key: None,
            github_api_url: "https://api.github.com".to_string(),
            gemini_api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model: "gemini-2.0-flash-exp".to_string(),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            search_timeout_secs: 15,
            enrichment_timeout_secs: 8,
            otlp_enabled: false,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            github_token: var("GITHUB_TOKEN").or_else(|| var("GIT_API_KEY")),
            gemini_api_key: var("GEMINI_API_KEY"),
            github_api_url: var("GITHUB_API_URL").unwrap_or(defaults.github_api_url),
            gemini_api_url: var("GEMINI_API_URL").unwrap_or(defaults.gemini_api_url),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            host: parsed("HOST")?.unwrap_or(defaults.host),
            port: parsed("PORT")?.unwrap_or(defaults.port),
            search_timeout_secs: parsed("SEARCH_TIMEOUT_SECS")?
                .unwrap_or(defaults.search_timeout_secs),
            enrichment_timeout_secs: parsed("ENRICHMENT_TIMEOUT_SECS")?
                .unwrap_or(defaults.enrichment_timeout_secs),
            otlp_enabled: var("OTEL_EXPORTER_OTLP_ENDPOINT").is_some(),
        })
    }
}

/// Reads a variable, treating blank values as unset.
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|raw| {
            raw.parse::<T>()
                .wrap_err_with(|| format!("{name} has an invalid value: {raw}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_public_providers() {
        let config = Config::default();

        assert_eq!(config.github_api_url, "https://api.github.com");
        assert!(config.gemini_api_url.starts_with("https://generativelanguage"));
        assert_eq!(config.port, 8000);
        assert!(config.github_token.is_none());
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_parsed_reports_variable_name() {
        // Unique name so parallel tests never race on it.
        env::set_var("REPO_HEALTH_TEST_BAD_PORT", "eighty");

        let err = parsed::<u16>("REPO_HEALTH_TEST_BAD_PORT").unwrap_err();
        assert!(err.to_string().contains("REPO_HEALTH_TEST_BAD_PORT"));

        env::remove_var("REPO_HEALTH_TEST_BAD_PORT");
    }

    #[test]
    fn test_blank_variable_is_unset() {
        env::set_var("REPO_HEALTH_TEST_BLANK", "   ");
        assert!(var("REPO_HEALTH_TEST_BLANK").is_none());
        env::remove_var("REPO_HEALTH_TEST_BLANK");
    }
}
