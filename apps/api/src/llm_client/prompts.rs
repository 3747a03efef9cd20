// Shared prompt fragments and sampling presets.
// Each generation kind builds its own prompt in generation/prompts.rs;
// this file holds the cross-cutting pieces.

use crate::llm_client::CompletionOptions;

/// Sampling temperature used for every generation call.
pub const TEMPERATURE: f32 = 0.7;

/// Appended to prompts whose answer is parsed as a comma-separated list.
pub const COMMA_LIST_INSTRUCTION: &str =
    "Return only the items, separated by commas, on a single line. \
    Do NOT number them. Do NOT include explanations or commentary.";

/// Appended to prompts whose answer is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

pub const CONTENT_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: TEMPERATURE,
    max_tokens: 1024,
};

pub const HASHTAG_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: TEMPERATURE,
    max_tokens: 256,
};

pub const POSTING_TIME_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: TEMPERATURE,
    max_tokens: 128,
};

pub const IMAGE_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: TEMPERATURE,
    max_tokens: 256,
};
