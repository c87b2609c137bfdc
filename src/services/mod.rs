pub mod analyzer;
pub mod paper_source;
pub mod result_store;

pub use analyzer::{AnalysisOutput, Analyzer, LlmAnalyzer, TaskKind};
pub use paper_source::{ArxivPaperSource, PaperSource};
pub use result_store::{JsonFileResultStore, ResultStore};
