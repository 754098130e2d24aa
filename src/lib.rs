//! onboard-assist: LLM-drafted employee onboarding, held in memory.

pub mod channels;
pub mod config;
pub mod error;
pub mod llm;
pub mod onboarding;
