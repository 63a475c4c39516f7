use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Weighted random pick from a count table.
///
/// Each entry's selection probability is its count over the total.
/// Implemented as a single integer draw in `[0, total)` walked through
/// the entries in their stable (sorted) order, which realizes exactly
/// the proportional distribution without floating-point accumulation.
///
/// Returns `None` on an empty table.
pub(crate) fn weighted_pick(counts: &BTreeMap<String, usize>) -> Option<String> {
	let total: usize = counts.values().sum();
	if total == 0 {
		return None;
	}

	let mut r = rand::rng().random_range(0..total);

	let mut fallback: Option<&String> = None;
	for (word, occurrence) in counts {
		if r < *occurrence {
			return Some(word.clone());
		}
		r -= occurrence;
		fallback = Some(word);
	}

	// Fallback: should not happen, but kept for safety.
	fallback.cloned()
}

/// A single context in an n-gram model.
///
/// A `State` corresponds to a fixed context key (one preceding word for
/// bigrams, a joined pair for trigrams) and stores all observed
/// transitions from this context to the next word.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// # Responsibilities
/// - Accumulate transition occurrences during learning
/// - Predict the next word by weighted random sampling
/// - Predict the most frequent next word, resolving ties fairly
/// - Merge with another state for the same context
///
/// # Invariants
/// - All transitions belong to the same context key
/// - Each transition occurrence count is strictly positive
/// - The transition table only grows
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct State {
	/// Identifier of the state (the joined context words).
	key: String,
	/// Outgoing transitions indexed by the next word, in stable sorted
	/// order. The value is how many times the transition was observed.
	transitions: BTreeMap<String, usize>,
}

impl State {
	/// Creates a new empty state for the given context key.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			transitions: BTreeMap::new(),
		}
	}

	/// Records an occurrence of a transition toward `next`.
	pub fn add_transition(&mut self, next: &str) {
		*self.transitions.entry(next.to_owned()).or_insert(0) += 1;
	}

	/// Number of times this context was observed in total.
	///
	/// Equals the sum of all outgoing transition counts.
	pub fn observations(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Occurrence count for one outgoing transition (0 if never seen).
	pub fn transition_count(&self, next: &str) -> usize {
		self.transitions.get(next).copied().unwrap_or(0)
	}

	/// Predicts the next word by weighted random sampling.
	///
	/// The probability of each candidate is proportional to its
	/// occurrence count. Returns `None` if the state has no transitions.
	pub fn predict(&self) -> Option<String> {
		weighted_pick(&self.transitions)
	}

	/// Predicts the most frequent next word.
	///
	/// Candidates tied for the maximum count are collected first and one
	/// of them is chosen uniformly at random; the draw never reaches
	/// candidates below the maximum. Returns `None` on no transitions.
	pub fn predict_frequent(&self) -> Option<String> {
		let max = self.transitions.values().copied().max()?;

		let top: Vec<&String> = self
			.transitions
			.iter()
			.filter(|(_, count)| **count == max)
			.map(|(word, _)| word)
			.collect();

		let pick = rand::rng().random_range(0..top.len());
		Some(top[pick].clone())
	}

	/// Merges another state into this one.
	///
	/// Both states must represent the same context key; transition
	/// occurrence counts are summed.
	pub fn merge(&mut self, other: &Self) {
		debug_assert_eq!(self.key, other.key, "merging states of different contexts");

		for (next, occurrence) in &other.transitions {
			*self.transitions.entry(next.clone()).or_insert(0) += *occurrence;
		}
	}
}
