use std::time::Duration;

use eyre::{bail, eyre, Result, WrapErr};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::{config::Config, models::RepositoryResult};

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .build()
                .wrap_err("Failed to create Gemini HTTP client")?,
            api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
            timeout: Duration::from_secs(config.enrichment_timeout_secs),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends a single prompt and returns the first candidate's text, trimmed.
    #[instrument(skip(self, prompt))]
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| eyre!("Gemini API key not configured"))?;

        let request = json!({
            "contents": [{
                "parts": [{
                    "text": prompt
                }]
            }],
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 200
            }
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.api_url, self.model
            ))
            .header("x-goog-api-key", api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .wrap_err("Failed to send request to Gemini API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .wrap_err("Failed to get response text from Gemini API")?;

        if !status.is_success() {
            bail!("Gemini API error: {status}");
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)
            .wrap_err_with(|| format!("Failed to parse Gemini response: {body}"))?;

        let text = gemini_response
            .candidates
            .first()
            .ok_or_else(|| eyre!("No candidates in Gemini response"))?
            .content
            .parts
            .first()
            .ok_or_else(|| eyre!("No parts in Gemini response"))?
            .text
            .trim();

        if text.is_empty() {
            bail!("Gemini returned an empty summary");
        }

        Ok(text.to_string())
    }
}

/// Prompt asking for a short explanatory paragraph about one repository.
pub fn summary_prompt(repo: &RepositoryResult) -> String {
    let topics = if repo.topics.is_empty() {
        "None".to_string()
    } else {
        repo.topics.join(", ")
    };

    format!(
        "Based on this GitHub repository information, write a single professional paragraph \
         (2-3 sentences) that explains what this project does and why it's useful. Highlight \
         the main technologies and unique features. Write it like a tech expert explaining the \
         project to another developer. Do not use bullet points.\n\n\
         Repository: {}\n\
         Description: {}\n\
         Language: {}\n\
         Stars: {}\n\
         Topics: {}",
        repo.full_name,
        repo.description.as_deref().unwrap_or("No description"),
        repo.primary_language.as_deref().unwrap_or("Not specified"),
        repo.star_count,
        topics,
    )
}
