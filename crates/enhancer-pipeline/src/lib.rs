pub mod config;
pub mod runner;
pub mod stream;

pub use config::PipelineConfig;
pub use runner::Enhancer;

#[cfg(test)]
pub(crate) mod test_support;
