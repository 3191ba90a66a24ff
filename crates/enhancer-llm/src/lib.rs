pub mod config;
pub mod provider;
pub mod providers;

pub use config::LlmConfig;
pub use provider::{CompletionProvider, FragmentStream, LLMError};
pub use providers::MiniMaxProvider;
