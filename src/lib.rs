// Re-export main components
pub mod api;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod index;
pub mod normalizer;
pub mod ranking;
pub mod tokenizer;

// Re-export commonly used types
pub use config::{Config, SearchConfig, ServerConfig};
pub use document::{load_documents, DocId, Document, DocumentType};
pub use engine::{DocumentFilter, DocumentMatch, SearchEngine, SearchIndex};
pub use error::{Error, Result};
pub use index::{Field, IndexStats, InvertedIndex, Posting};
pub use normalizer::Normalizer;
pub use ranking::{FieldWeights, MatchDetail, Ranker};
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
