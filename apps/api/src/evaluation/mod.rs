// Evaluation: prompt building, the two-call pipeline, and its HTTP handlers.
// All LLM calls go through llm_client::TextGenerator.

pub mod builder;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
