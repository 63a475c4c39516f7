//! In-memory text-analytics toolkit.
//!
//! This crate provides two families of functionality sharing one
//! text-normalization step:
//! - Word-level Markov chain models (bigram and trigram) that learn
//!   transition counts from text and generate plausible next words
//! - A vector-space document index scoring documents against queries
//!   with tf-idf weighting and cosine similarity
//!
//! All state lives in explicit instance types; nothing is global. A caller
//! owns a model or an index, feeds it raw text, and consumes generated
//! words or ranked results.

/// Crate-level error type.
///
/// Structural failures (duplicate document names, too-little input,
/// mismatched model orders) are surfaced through this enum; everything
/// else is a total function over its inputs.
pub mod error;

/// Markov chain models over words.
///
/// Exposes the n-gram model itself and the per-context transition state.
pub mod model;

/// Shared text normalization.
///
/// Converts raw text into a cleaned, lowercase token stream, optionally
/// segmented into sentences. Used by both the models and the index.
pub mod normalizer;

/// Vector-space document retrieval.
///
/// Documents, stopwords, and the tf-idf index with cosine-similarity
/// queries.
pub mod vectorspace;
