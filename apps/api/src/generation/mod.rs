// Post generation: sanitizing, prompt building, provider calls and the
// aggregation workflow that joins them into one GeneratedPost.
// All LLM calls go through llm_client — no direct provider HTTP calls here.

pub mod generator;
pub mod handlers;
pub mod platform;
pub mod prompts;
pub mod sanitizer;
pub mod tone;
pub mod workflow;
