//! Vector-space document retrieval.
//!
//! This module provides the tf-idf side of the toolkit:
//! - Indexed documents and their derived weight vectors (`Document`)
//! - The mutable stopword set (`StopwordSet`)
//! - The index itself: corpus statistics, stopword-driven re-indexing,
//!   and cosine-similarity queries (`DocumentIndex`)

/// An indexed document: name, raw text, term frequencies, and the
/// derived tf-idf weight vector.
pub mod document;

/// The document index: owns the corpus, maintains corpus statistics,
/// and answers ranked similarity queries.
pub mod index;

/// Normalized terms excluded from vector-space processing.
pub mod stopwords;
