//! Completion providers.

pub(crate) mod common;
pub mod minimax;

pub use minimax::MiniMaxProvider;
