use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::document::Document;
use super::stopwords::StopwordSet;
use crate::error::TextModelError;
use crate::normalizer;

/// A ranked query match.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredDocument {
	pub name: String,
	pub score: f64,
}

/// Cosine similarity between two term-weight vectors.
///
/// The dot product accumulates over the keys of `a` (a key absent from
/// `b` contributes zero); each norm sums squares over its own map's
/// keys, not the intersection. Returns `None` when either norm is
/// zero: "no similarity", never a score.
pub fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> Option<f64> {
	let mut dot = 0.0;
	let mut a_sqrs = 0.0;
	for (term, wa) in a {
		a_sqrs += wa * wa;
		if let Some(wb) = b.get(term) {
			dot += wa * wb;
		}
	}

	let b_sqrs: f64 = b.values().map(|w| w * w).sum();

	let norm = a_sqrs.sqrt() * b_sqrs.sqrt();
	if norm == 0.0 {
		return None;
	}
	Some(dot / norm)
}

/// Vector-space model over a corpus of named documents.
///
/// Owns the documents, the stopword set, and the derived corpus
/// statistics; scores documents against free-text queries with tf-idf
/// weights and cosine similarity.
///
/// # Responsibilities
/// - Turn raw text into augmented term-frequency vectors (`process`)
/// - Maintain document frequencies and per-term document occurrences
///   incrementally across adds and stopword imports
/// - Recompute every document's tf-idf weights after structural changes
/// - Answer ranked similarity queries
///
/// # Invariants
/// - A document name is added at most once
/// - `document_freqs[t]` equals the number of distinct documents whose
///   tf map contains `t`, and `document_occurrences[t]` names exactly
///   those documents; terms purged by a stopword import leave both
/// - `document_occurrences` never references an absent document (no
///   removal operation exists)
///
/// Single-threaded by design: every operation completes before
/// returning, and nothing here suspends or spawns.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DocumentIndex {
	corpus: HashMap<String, Document>,
	/// term -> number of distinct documents containing it.
	document_freqs: HashMap<String, usize>,
	/// term -> names of the documents containing it.
	document_occurrences: HashMap<String, HashSet<String>>,
	stopwords: StopwordSet,
}

impl DocumentIndex {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of indexed documents.
	pub fn document_count(&self) -> usize {
		self.corpus.len()
	}

	pub fn is_empty(&self) -> bool {
		self.corpus.is_empty()
	}

	/// Looks up a document by name.
	pub fn document(&self, name: &str) -> Option<&Document> {
		self.corpus.get(name)
	}

	/// Number of distinct documents containing the term (0 for unknown
	/// or purged terms).
	pub fn document_frequency(&self, term: &str) -> usize {
		self.document_freqs.get(term).copied().unwrap_or(0)
	}

	/// The current stopword set.
	pub fn stopwords(&self) -> &StopwordSet {
		&self.stopwords
	}

	/// Turns raw text into an augmented term-weight map.
	///
	/// The whole text is one token stream (no sentence segmentation).
	/// Raw counts are rescaled against the text's own most frequent
	/// surviving term: `0.5 + 0.5 * count / max_count`, bounding every
	/// weight in (0.5, 1.0]. Document length plays no other role.
	///
	/// An empty or all-stopword text yields an empty map; the maximum
	/// count is never referenced in that case.
	pub fn process(&self, text: &str, apply_stopwords: bool) -> HashMap<String, f64> {
		let mut counts: HashMap<String, usize> = HashMap::new();
		for token in normalizer::tokens(text) {
			if apply_stopwords && self.stopwords.contains(&token) {
				continue;
			}
			*counts.entry(token).or_insert(0) += 1;
		}

		let Some(max) = counts.values().copied().max() else {
			return HashMap::new();
		};
		let max = max as f64;

		counts
			.into_iter()
			.map(|(term, count)| (term, 0.5 + 0.5 * (count as f64 / max)))
			.collect()
	}

	/// Adds a document to the corpus.
	///
	/// Computes its term vector with stopwords applied, records each
	/// distinct term once in the corpus statistics (regardless of its
	/// in-document count), then recomputes every document's tf-idf
	/// weights.
	///
	/// # Errors
	/// `DuplicateDocument` when the name is already taken; nothing is
	/// touched in that case. There is no update-in-place; pick a new
	/// name.
	pub fn add_document(&mut self, name: &str, text: &str) -> Result<(), TextModelError> {
		if self.corpus.contains_key(name) {
			return Err(TextModelError::DuplicateDocument(name.to_owned()));
		}

		let tf = self.process(text, true);

		for term in tf.keys() {
			*self.document_freqs.entry(term.clone()).or_insert(0) += 1;
			self.document_occurrences
				.entry(term.clone())
				.or_default()
				.insert(name.to_owned());
		}

		log::debug!("indexed document '{}' ({} distinct terms)", name, tf.len());
		self.corpus.insert(name.to_owned(), Document::new(name, text, tf));
		self.update_values();

		Ok(())
	}

	/// Recomputes every document's tf-idf weights from the current
	/// corpus statistics.
	///
	/// `idf(t) = log10(1 + document_count / document_frequency(t))`;
	/// each document's weight map is rewritten wholesale rather than
	/// patched. Runs after every structural change to the corpus; also
	/// the documented way to refresh weights after a stopword import
	/// (see `import_stopwords`).
	pub fn update_values(&mut self) {
		let document_count = self.corpus.len() as f64;

		for doc in self.corpus.values_mut() {
			let mut weights = HashMap::with_capacity(doc.tf().len());
			for (term, tf) in doc.tf() {
				// Invariant: every stored term has a document frequency.
				let df = self.document_freqs[term] as f64;
				let idf = (1.0 + document_count / df).log10();
				weights.insert(term.clone(), tf * idf);
			}
			doc.replace_weights(weights);
		}
	}

	/// Imports stopwords and retroactively purges them from the corpus.
	///
	/// Every newly recognized term is deleted from the document
	/// frequencies, from the tf and weight maps of each document listed
	/// in its occurrences, and from the occurrences themselves. Terms
	/// that were already stopwords are untouched.
	///
	/// The idf of surviving terms is NOT recomputed here; their stored
	/// weights keep the values of the last `update_values` run. Call
	/// `update_values` afterwards for freshly derived weights.
	pub fn import_stopwords(&mut self, text: &str) {
		let added = self.stopwords.import(text);
		if self.corpus.is_empty() || added.is_empty() {
			return;
		}

		let mut purged = 0usize;
		for term in &added {
			self.document_freqs.remove(term);
			if let Some(names) = self.document_occurrences.remove(term) {
				for name in names {
					if let Some(doc) = self.corpus.get_mut(&name) {
						doc.remove_term(term);
						purged += 1;
					}
				}
			}
		}

		log::debug!(
			"imported {} stopwords, purged {} term entries",
			added.len(),
			purged
		);
	}

	/// Ranks documents against a free-text query.
	///
	/// The query becomes a term-weight vector via `process` (stopwords
	/// applied). Candidates are exactly the documents sharing at least
	/// one term with the query; everything else is absent from the
	/// result, not scored zero. Each candidate's stored weight vector is
	/// compared to the query by cosine similarity; results come back in
	/// descending score order, with no defined ordering among ties.
	pub fn query(&self, text: &str) -> Vec<ScoredDocument> {
		let qvec = self.process(text, true);

		let mut candidates: HashSet<&String> = HashSet::new();
		for term in qvec.keys() {
			if let Some(names) = self.document_occurrences.get(term) {
				candidates.extend(names);
			}
		}

		let mut results: Vec<ScoredDocument> = candidates
			.into_iter()
			.filter_map(|name| {
				// Invariant: occurrences only reference live documents.
				let doc = self.corpus.get(name)?;
				cosine_similarity(&qvec, doc.weights()).map(|score| ScoredDocument {
					name: name.clone(),
					score,
				})
			})
			.collect();

		results.sort_by(|a, b| b.score.total_cmp(&a.score));
		results
	}
}
