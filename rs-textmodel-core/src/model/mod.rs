//! Markov chain models over words.
//!
//! This module provides the word-level n-gram machinery:
//! - Fixed-order models for bigrams and trigrams (`NGramModel`)
//! - Per-context transition state with weighted sampling (`State`)

/// Bigram/trigram model: sentence ingestion, transition counting,
/// weighted and most-frequent next-word prediction, merging.
pub mod ngram_model;

/// Internal representation of a single context and its outgoing
/// transitions. Not exposed publicly.
mod state;
