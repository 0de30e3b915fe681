//! Minimal Claude client retained from the provider-agnostic original.
//!
//! Trimmed to the single provider and call shape Terascout needs
//! (`chat_completion` free-text calls); the forced-tool-use extraction
//! path, the OpenAI/OpenRouter providers, and the `Agent`/`PromptBuilder`
//! trait machinery were dropped — see `DESIGN.md`.

pub mod claude;
pub mod util;

pub use claude::Claude;
