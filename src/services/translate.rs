use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::core::SOURCE_LANGUAGE;

/// Errors that can occur when calling the translation provider
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Languages offered to clients, with their display labels
pub const SUPPORTED_LANGUAGES: [(&str, &str); 13] = [
    ("vi", "Tiếng Việt"),
    ("en", "English"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("es", "Español"),
    ("it", "Italiano"),
    ("ru", "Русский"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("zh", "中文 (简体)"),
    ("th", "ไทย"),
    ("id", "Bahasa Indonesia"),
    ("ms", "Bahasa Melayu"),
];

/// Whether `code` is one of [`SUPPORTED_LANGUAGES`]
pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(supported, _)| *supported == code)
}

/// Map a client language code to the provider's code
pub fn provider_language(code: &str) -> &str {
    match code {
        "zh" => "zh-CN",
        other => other,
    }
}

/// Translation provider client
///
/// Translates narration text out of the source language. Requests for the
/// source language itself never reach the provider.
pub struct TranslationClient {
    base_url: String,
    client: Client,
}

impl TranslationClient {
    /// Create a new translation client
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, TranslateError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    /// Translate `text` into `target`
    pub async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        if target == SOURCE_LANGUAGE || text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let url = format!(
            "{}/translate_a/single?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(provider_language(target)),
            urlencoding::encode(text)
        );

        tracing::debug!("Translating {} chars to {}", text.len(), target);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "Failed to translate: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        parse_translation(&json)
    }
}

/// Join the translated segments of a provider response
///
/// The response is a nested array whose first element lists
/// `[translated, original, ...]` segments.
fn parse_translation(json: &Value) -> Result<String, TranslateError> {
    let segments = json
        .get(0)
        .and_then(|s| s.as_array())
        .ok_or_else(|| TranslateError::InvalidResponse("Missing segments array".into()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|t| t.as_str()))
        .collect();

    if translated.is_empty() {
        return Err(TranslateError::InvalidResponse("Empty translation".into()));
    }

    Ok(translated)
}
