use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::normalizer;

/// A set of normalized terms excluded from vector-space processing.
///
/// Terms only ever enter the set; re-importing an existing stopword is
/// a no-op for that term. The destructive effect an import has on an
/// existing corpus lives in the index, not here.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct StopwordSet {
	words: HashSet<String>,
}

impl StopwordSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Imports stopwords from raw text (newline- or whitespace-separated
	/// words; any punctuation is stripped by normalization).
	///
	/// Stopword filtering is never applied to the import text itself.
	/// Returns the terms that were actually new, in input order; the
	/// index purges exactly those from an existing corpus.
	pub fn import(&mut self, text: &str) -> Vec<String> {
		let mut added = Vec::new();
		for token in normalizer::tokens(text) {
			if self.words.insert(token.clone()) {
				added.push(token);
			}
		}
		added
	}

	/// Whether the (normalized) term is a stopword.
	pub fn contains(&self, term: &str) -> bool {
		self.words.contains(term)
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}
