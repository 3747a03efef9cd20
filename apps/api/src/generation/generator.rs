//! Generation client — one provider call per generation kind, parsed into typed output.
//!
//! Text operations propagate provider failures as `LlmError`. The image suggestion is
//! the exception: any failure degrades to a fixed fallback suggestion.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::generation::platform::Platform;
use crate::generation::prompts::{
    build_content_prompt, build_hashtag_prompt, build_image_prompt, build_posting_time_prompt,
};
use crate::generation::tone::Tone;
use crate::llm_client::prompts::{
    CONTENT_OPTIONS, HASHTAG_OPTIONS, IMAGE_OPTIONS, POSTING_TIME_OPTIONS,
};
use crate::llm_client::{strip_json_fences, CompletionProvider, LlmError};

pub const MAX_HASHTAGS: usize = 7;

/// Exclusive upper bound of the cache-busting `sig` parameter.
const SIGNATURE_RANGE: u32 = 1000;
const FALLBACK_QUERY: &str = "business-technology";

/// A user submission. Constructed fresh per request; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub topic: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSuggestion {
    pub url: String,
    pub alt_text: String,
    pub description: String,
}

/// Shape the image prompt asks the model for.
#[derive(Debug, Deserialize)]
struct RawImageSuggestion {
    query: String,
    description: String,
    alt: String,
}

pub async fn generate_content(
    llm: &dyn CompletionProvider,
    request: &ContentRequest,
) -> Result<String, LlmError> {
    let prompt = build_content_prompt(&request.topic, request.platform, request.tone);
    llm.submit_prompt(&prompt, &CONTENT_OPTIONS).await
}

pub async fn generate_hashtags(
    llm: &dyn CompletionProvider,
    topic: &str,
    platform: Platform,
) -> Result<Vec<String>, LlmError> {
    let prompt = build_hashtag_prompt(topic, platform);
    let text = llm.submit_prompt(&prompt, &HASHTAG_OPTIONS).await?;
    Ok(parse_hashtags(&text))
}

pub async fn suggest_posting_times(
    llm: &dyn CompletionProvider,
    platform: Platform,
) -> Result<Vec<String>, LlmError> {
    let prompt = build_posting_time_prompt(platform);
    let text = llm.submit_prompt(&prompt, &POSTING_TIME_OPTIONS).await?;
    Ok(parse_posting_times(&text))
}

/// Never fails: provider errors and unusable answers both yield the fallback suggestion.
pub async fn generate_image_suggestion(
    llm: &dyn CompletionProvider,
    topic: &str,
    platform: Platform,
    image_host: &str,
) -> ImageSuggestion {
    let prompt = build_image_prompt(topic, platform);
    match llm.submit_prompt(&prompt, &IMAGE_OPTIONS).await {
        Ok(text) => parse_image_suggestion(&text, topic, image_host),
        Err(e) => {
            warn!("Image suggestion call failed, using fallback: {e}");
            fallback_image_suggestion(topic, image_host)
        }
    }
}

/// Comma-split, trimmed, `#`-prefixed only, at most `MAX_HASHTAGS`.
pub fn parse_hashtags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| tag.starts_with('#'))
        .take(MAX_HASHTAGS)
        .map(str::to_string)
        .collect()
}

/// Comma-split and trimmed. The format is not validated.
pub fn parse_posting_times(text: &str) -> Vec<String> {
    text.split(',').map(|t| t.trim().to_string()).collect()
}

pub fn parse_image_suggestion(text: &str, topic: &str, image_host: &str) -> ImageSuggestion {
    let raw = match serde_json::from_str::<RawImageSuggestion>(strip_json_fences(text)) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Malformed image suggestion, using fallback: {e}");
            return fallback_image_suggestion(topic, image_host);
        }
    };

    let query = normalize_query(&raw.query);
    let alt_text = raw.alt.trim();
    let description = raw.description.trim();
    if query.is_empty() || alt_text.is_empty() || description.is_empty() {
        warn!("Image suggestion had a blank field, using fallback");
        return fallback_image_suggestion(topic, image_host);
    }

    ImageSuggestion {
        url: image_url(image_host, &query),
        alt_text: alt_text.to_string(),
        description: description.to_string(),
    }
}

pub fn fallback_image_suggestion(topic: &str, image_host: &str) -> ImageSuggestion {
    ImageSuggestion {
        url: image_url(image_host, FALLBACK_QUERY),
        alt_text: "Business technology".to_string(),
        description: format!("A professional image related to {}", topic.trim()),
    }
}

/// Lower-cased, trimmed, whitespace runs replaced with single hyphens.
/// Anything but ASCII letters, digits and inner hyphens is dropped so the
/// query cannot break out of the URL's query string.
fn normalize_query(query: &str) -> String {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .map(|word| word.trim_matches('-').to_string())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// `sig` varies per call so repeated queries do not hit a cached image.
fn image_url(image_host: &str, query: &str) -> String {
    let sig = rand::thread_rng().gen_range(0..SIGNATURE_RANGE);
    format!("https://{image_host}/featured/800x600?{query}&sig={sig}")
}
