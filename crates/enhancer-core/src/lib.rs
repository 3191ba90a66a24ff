pub mod envelope;
pub mod error;
pub mod events;
pub mod instruction;
pub mod scoring;
pub mod template;
pub mod types;

pub use envelope::{compact_version, improvements_for, EnhancementPath, TemplateReason};
pub use error::{EnhanceError, INPUT_REQUIRED};
pub use events::StreamEvent;
pub use instruction::{build_user_message, SYSTEM_INSTRUCTION};
pub use scoring::score;
pub use template::generate_template;
pub use types::{EnhancementRequest, EnhancementResult, QualityScore, DEFAULT_MODE};
