pub mod extractor;
pub mod service;

pub use extractor::{JsonBlockExtractor, StructuredExtractor};
pub use service::{AiAnalysis, AnalysisError, DiffAnalyzer, GeminiAnalyzer};
