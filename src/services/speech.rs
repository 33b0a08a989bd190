use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::translate::provider_language;

/// Longest text the TTS endpoint accepts per request
pub const MAX_CHUNK_CHARS: usize = 200;

/// Errors that can occur while synthesizing narration audio
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Failed to write audio file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Nothing to synthesize")]
    EmptyText,
}

/// Text-to-speech client
///
/// Fetches mp3 audio chunk by chunk and stores the joined file under
/// `output_dir`, served back at `public_path`.
pub struct SpeechClient {
    base_url: String,
    client: Client,
    output_dir: PathBuf,
    public_path: String,
}

impl SpeechClient {
    pub fn new(
        base_url: String,
        output_dir: PathBuf,
        public_path: String,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            client,
            output_dir,
            public_path,
        })
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Synthesize `text` and return the public URL of the stored mp3
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        file_stem: &str,
    ) -> Result<String, SpeechError> {
        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = format!(
                "{}/translate_tts?ie=UTF-8&client=tw-ob&tl={}&total={}&idx={}&textlen={}&q={}",
                self.base_url.trim_end_matches('/'),
                urlencoding::encode(provider_language(language)),
                total,
                idx,
                chunk.chars().count(),
                urlencoding::encode(chunk)
            );

            let response = self.client.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(SpeechError::ApiError(format!(
                    "Failed to synthesize chunk {}: {}",
                    idx,
                    response.status()
                )));
            }

            audio.extend_from_slice(&response.bytes().await?);
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let file_name = format!("{}.mp3", file_stem);
        tokio::fs::write(self.output_dir.join(&file_name), &audio).await?;

        tracing::debug!("Wrote {} bytes of audio to {}", audio.len(), file_name);

        Ok(format!("{}/{}", self.public_path.trim_end_matches('/'), file_name))
    }

    /// Synthesize narration for a restaurant, returning `None` on failure
    pub async fn narration_audio(&self, text: &str, language: &str, restaurant_id: i32) -> Option<String> {
        let stem = format!("{}_{}", restaurant_id, language);
        match self.synthesize(text, language, &stem).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Speech synthesis failed for restaurant {}: {}", restaurant_id, e);
                None
            }
        }
    }
}

/// Split text into chunks of at most `max_chars` characters on word boundaries
///
/// Words longer than `max_chars` are cut at character boundaries.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
