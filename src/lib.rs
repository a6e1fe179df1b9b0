pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, AnalyzerConfig, CliConfig};

pub use crate::core::{
    emitter::SequenceEmitter, engine::AnalyzerEngine, languages::LanguageRegistry,
    pipeline::AnalyzerPipeline,
};
pub use utils::error::{AnalyzerError, Result};
