use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A document in the corpus.
///
/// Created once when added to the index; the raw text and term
/// frequencies never change afterwards. The weight map is derived and
/// rewritten by the index whenever corpus-wide statistics change, so it
/// is empty until the first recomputation and owned exclusively by the
/// index.
///
/// The term-frequency values are the augmented frequencies produced by
/// the index's `process` step (`0.5 + 0.5 * count / max_count`, scaled
/// against the document's own most frequent term), not raw counts.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Document {
	name: String,
	text: String,
	tf: HashMap<String, f64>,
	weights: HashMap<String, f64>,
}

impl Document {
	pub(crate) fn new(name: &str, text: &str, tf: HashMap<String, f64>) -> Self {
		Self {
			name: name.to_owned(),
			text: text.to_owned(),
			tf,
			weights: HashMap::new(),
		}
	}

	/// The unique name this document was added under.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The raw text as supplied by the caller.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Augmented term frequencies, stopwords already excluded.
	pub fn tf(&self) -> &HashMap<String, f64> {
		&self.tf
	}

	/// The tf-idf weight vector derived from the current corpus.
	pub fn weights(&self) -> &HashMap<String, f64> {
		&self.weights
	}

	/// Replaces the whole weight map after an idf recomputation.
	pub(crate) fn replace_weights(&mut self, weights: HashMap<String, f64>) {
		self.weights = weights;
	}

	/// Drops a term that became a stopword.
	pub(crate) fn remove_term(&mut self, term: &str) {
		self.tf.remove(term);
		self.weights.remove(term);
	}
}
