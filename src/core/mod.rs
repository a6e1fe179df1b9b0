pub mod classify;
pub mod emitter;
pub mod engine;
pub mod graph;
pub mod imports;
pub mod languages;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod summary;
pub mod symbols;
pub mod tree;

pub use crate::domain::model::{AnalysisReport, ScanResult, SourceFile};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
