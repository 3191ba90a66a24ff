//! Response envelope assembly.

use crate::scoring::score;
use crate::types::{EnhancementResult, QualityScore};

const COMPACT_SEPARATOR: &str = " → ";
const COMPACT_HEADERS: usize = 3;

/// Why the template path was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateReason {
    NotConfigured,
    RemoteFailed,
}

/// Which producer generated the optimized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhancementPath {
    Remote { model: String },
    Template(TemplateReason),
}

impl EnhancementPath {
    pub fn label(&self) -> String {
        match self {
            EnhancementPath::Remote { model } => format!("{model} enhancement"),
            EnhancementPath::Template(TemplateReason::NotConfigured) => {
                "Template-based (no API key)".to_string()
            }
            EnhancementPath::Template(TemplateReason::RemoteFailed) => {
                "Template fallback (remote unavailable)".to_string()
            }
        }
    }
}

/// Ordered labels describing the pipeline stages. The first four are fixed.
pub fn improvements_for(score: &QualityScore, path: &EnhancementPath) -> Vec<String> {
    vec![
        "Intent extraction".to_string(),
        "Domain context enrichment".to_string(),
        "Structural optimization".to_string(),
        format!("Quality scoring ({:.1})", score.final_score()),
        path.label(),
    ]
}

/// Digest made of the first three header lines, without their `#` markers.
pub fn compact_version(text: &str) -> String {
    text.lines()
        .map(str::trim_start)
        .filter(|line| line.starts_with('#'))
        .take(COMPACT_HEADERS)
        .map(|line| line.trim_start_matches('#').trim())
        .collect::<Vec<_>>()
        .join(COMPACT_SEPARATOR)
}

impl EnhancementResult {
    /// Score `optimized_prompt` and build the envelope for it.
    pub fn assemble(optimized_prompt: String, path: &EnhancementPath) -> Self {
        let score = score(&optimized_prompt);
        log::debug!(
            "Scored {} chars via {:?}: {:.1}",
            optimized_prompt.len(),
            path,
            score.final_score()
        );

        Self {
            improvements_applied: improvements_for(&score, path),
            compact_version: compact_version(&optimized_prompt),
            score,
            optimized_prompt,
        }
    }
}
