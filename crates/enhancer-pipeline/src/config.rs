use std::time::Duration;

pub const DEFAULT_TOKEN_DELAY: Duration = Duration::from_millis(10);

/// Configuration for the enhancement pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Pause between synthesized template chunks in streaming mode.
    pub token_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            token_delay: DEFAULT_TOKEN_DELAY,
        }
    }
}
