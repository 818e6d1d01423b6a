// Report synthesis: prompt contract, one generator call, validation/repair, fallback.
// All LLM calls go through llm_client — no direct HTTP calls here.

pub mod fallback;
pub mod handlers;
pub mod prompts;
pub mod repair;
pub mod synthesizer;
