// All LLM prompt templates for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::generation::platform::Platform;
use crate::generation::tone::Tone;
use crate::llm_client::prompts::{COMMA_LIST_INSTRUCTION, JSON_ONLY_INSTRUCTION};

/// Post body prompt.
/// Replace: {tone}, {platform}, {topic}, {max_length}, {style_hint}
pub const CONTENT_PROMPT_TEMPLATE: &str = "Create a {tone} social media post for {platform} about: {topic}.
Maximum length: {max_length} characters.
Style: {style_hint}
Include relevant emojis where appropriate.
Format the text with proper spacing and line breaks.
Use **bold** or *italic* emphasis sparingly.";

/// Hashtag prompt.
/// Replace: {platform}, {topic}, {convention}, {list_instruction}
pub const HASHTAG_PROMPT_TEMPLATE: &str = "Generate 5 to 7 relevant hashtags for a {platform} post about: {topic}.
Mix broad, high-reach hashtags with niche hashtags specific to the topic.
{convention}
Every hashtag MUST start with #.
{list_instruction}";

/// Posting time prompt.
/// Replace: {platform}, {list_instruction}
pub const POSTING_TIME_PROMPT_TEMPLATE: &str = "What are the 2 best times to post on {platform} for maximum engagement?
Return exactly 2 times in the format \"Day HH:MM AM/PM\", for example \"Tuesday 10:00 AM\".
{list_instruction}";

/// Image suggestion prompt.
/// Replace: {platform}, {topic}, {json_instruction}
pub const IMAGE_PROMPT_TEMPLATE: &str = r#"Suggest exactly one stock photo to accompany a {platform} post about: {topic}.

Return a JSON object with this EXACT schema (no extra fields):
{
  "query": "two to four word photo search phrase",
  "description": "one sentence describing the photo",
  "alt": "short alt text for screen readers"
}

{json_instruction}"#;

pub fn build_content_prompt(topic: &str, platform: Platform, tone: Tone) -> String {
    let spec = platform.spec();
    CONTENT_PROMPT_TEMPLATE
        .replace("{tone}", tone.as_str())
        .replace("{platform}", platform.as_str())
        .replace("{max_length}", &spec.max_length.to_string())
        .replace("{style_hint}", spec.style_hint)
        // topic last so user text containing a placeholder is never expanded
        .replace("{topic}", topic)
}

pub fn build_hashtag_prompt(topic: &str, platform: Platform) -> String {
    HASHTAG_PROMPT_TEMPLATE
        .replace("{platform}", platform.as_str())
        .replace("{convention}", platform.hashtag_convention())
        .replace("{list_instruction}", COMMA_LIST_INSTRUCTION)
        .replace("{topic}", topic)
}

pub fn build_posting_time_prompt(platform: Platform) -> String {
    POSTING_TIME_PROMPT_TEMPLATE
        .replace("{platform}", platform.as_str())
        .replace("{list_instruction}", COMMA_LIST_INSTRUCTION)
}

pub fn build_image_prompt(topic: &str, platform: Platform) -> String {
    IMAGE_PROMPT_TEMPLATE
        .replace("{platform}", platform.as_str())
        .replace("{json_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_prompt_embeds_request_and_platform_limits() {
        let prompt = build_content_prompt("our new API", Platform::X, Tone::Casual);
        assert!(prompt.contains("casual social media post for x"));
        assert!(prompt.contains("about: our new API"));
        assert!(prompt.contains("Maximum length: 280 characters"));
        assert!(prompt.contains("Style: concise and engaging"));
        assert!(prompt.contains("emojis"));
        assert!(prompt.contains("line breaks"));
    }

    #[test]
    fn test_content_prompt_uses_linkedin_limits() {
        let prompt = build_content_prompt("hiring", Platform::Linkedin, Tone::Formal);
        assert!(prompt.contains("Maximum length: 3000 characters"));
        assert!(prompt.contains("professional and detailed"));
        assert!(!prompt.contains('{'), "all placeholders must be filled: {prompt}");
    }

    #[test]
    fn test_topic_placeholders_are_not_expanded() {
        let prompt = build_content_prompt("why {max_length} matters", Platform::X, Tone::Casual);
        assert!(prompt.contains("about: why {max_length} matters"));
    }

    #[test]
    fn test_hashtag_prompt_requests_comma_separated_tags() {
        let prompt = build_hashtag_prompt("rust", Platform::Instagram);
        assert!(prompt.contains("5 to 7"));
        assert!(prompt.contains("start with #"));
        assert!(prompt.contains("separated by commas"));
        assert!(prompt.contains("niche"));
        assert!(prompt.contains(Platform::Instagram.hashtag_convention()));
    }

    #[test]
    fn test_posting_time_prompt_fixes_format() {
        let prompt = build_posting_time_prompt(Platform::Linkedin);
        assert!(prompt.contains("2 best times to post on linkedin"));
        assert!(prompt.contains("\"Day HH:MM AM/PM\""));
        assert!(prompt.contains("separated by commas"));
    }

    #[test]
    fn test_image_prompt_asks_for_structured_object() {
        let prompt = build_image_prompt("coffee", Platform::Instagram);
        assert!(prompt.contains("exactly one"));
        assert!(prompt.contains("\"query\""));
        assert!(prompt.contains("\"description\""));
        assert!(prompt.contains("\"alt\""));
        assert!(prompt.contains("valid JSON only"));
    }
}
