use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::state::{self, State};
use crate::error::TextModelError;
use crate::normalizer;

/// Start-of-sentence sentinel context token.
///
/// The normalizer strips `|` from all input, so the sentinel can never
/// collide with a learned word.
pub const START_TOKEN: &str = "|";

/// Order of an n-gram model: how many words an observed window spans.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelOrder {
	Bigram,
	Trigram,
}

impl ModelOrder {
	/// Window size slid across a sentence during learning.
	pub const fn window(self) -> usize {
		match self {
			ModelOrder::Bigram => 2,
			ModelOrder::Trigram => 3,
		}
	}

	/// Number of preceding words forming a lookup context.
	pub const fn context_len(self) -> usize {
		self.window() - 1
	}
}

/// What `predict` returns for a context the model has never seen.
///
/// Two policies exist in this domain and each model carries exactly one:
/// - `EmptyToken`: "unknown word". The empty string; the caller decides
///   what to do next. Default for bigram models.
/// - `Terminator`: "end generation". A period; generation loops treat
///   it as the end of the sentence. Default for trigram models.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
	EmptyToken,
	Terminator,
}

impl Fallback {
	fn token(self) -> String {
		match self {
			Fallback::EmptyToken => String::new(),
			Fallback::Terminator => ".".to_owned(),
		}
	}
}

/// Word-level Markov chain model of a fixed order.
///
/// The model maps a context (the preceding word for bigrams, the
/// preceding pair for trigrams, flattened into a single space-joined
/// key) to the distribution of observed next words. A reserved sentinel
/// context marks the start of a sentence and is always a valid key.
/// Trigram models additionally keep a table of sentence-opening words so
/// generation can start a sentence without any preceding pair.
///
/// # Responsibilities
/// - Ingest normalized sentences and accumulate transition counts
/// - Predict the next word by weighted random sampling, or by highest
///   count with fair tie-breaking
/// - Merge with another model of the same order
///
/// # Invariants
/// - Transition and start counts are >= 1 once present and only grow
/// - For any context, the sum of next-word counts equals the number of
///   times that context was observed during learning
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NGramModel {
	order: ModelOrder,
	fallback: Fallback,
	/// Context key -> observed next-word distribution.
	transitions: HashMap<String, State>,
	/// First-word-of-sentence counts; only populated for trigrams.
	starts: BTreeMap<String, usize>,
}

impl NGramModel {
	/// Creates an empty model of the given order with that order's
	/// default fallback policy.
	pub fn new(order: ModelOrder) -> Self {
		let fallback = match order {
			ModelOrder::Bigram => Fallback::EmptyToken,
			ModelOrder::Trigram => Fallback::Terminator,
		};
		Self {
			order,
			fallback,
			transitions: HashMap::new(),
			starts: BTreeMap::new(),
		}
	}

	/// Empty bigram model ("unknown word" fallback).
	pub fn bigram() -> Self {
		Self::new(ModelOrder::Bigram)
	}

	/// Empty trigram model ("end generation" fallback).
	pub fn trigram() -> Self {
		Self::new(ModelOrder::Trigram)
	}

	/// The model's order.
	pub fn order(&self) -> ModelOrder {
		self.order
	}

	/// The token `predict` returns for an unseen context.
	pub fn fallback(&self) -> Fallback {
		self.fallback
	}

	/// Overrides the fallback policy for this model.
	pub fn set_fallback(&mut self, fallback: Fallback) {
		self.fallback = fallback;
	}

	/// True if nothing has been learned yet.
	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Learns from raw text.
	///
	/// The text is normalized and segmented into sentences; each
	/// sentence with at least `order` tokens is ingested, shorter ones
	/// are skipped silently.
	///
	/// # Errors
	/// `InsufficientInput` when the entire input carries fewer tokens
	/// than the model order requires: there is nothing to learn from.
	pub fn learn(&mut self, text: &str) -> Result<(), TextModelError> {
		let sentences = normalizer::normalize(text, true);

		let total: usize = sentences.iter().map(Vec::len).sum();
		if total < self.order.window() {
			return Err(TextModelError::InsufficientInput {
				need: self.order.window(),
				got: total,
			});
		}

		for sentence in &sentences {
			self.add_sentence(sentence);
		}

		log::debug!(
			"learned {} sentences into {:?} model ({} contexts)",
			sentences.len(),
			self.order,
			self.transitions.len()
		);
		Ok(())
	}

	/// Ingests one normalized sentence.
	///
	/// Records the sentinel-context transition for the sentence opening
	/// (and, for trigrams, the start-table increment), then slides a
	/// window of the model order across the sentence. Sentences shorter
	/// than the order are a silent no-op.
	pub fn add_sentence(&mut self, words: &[String]) {
		if words.len() < self.order.window() {
			return;
		}

		match self.order {
			ModelOrder::Bigram => {
				self.observe(START_TOKEN.to_owned(), &words[0]);
				for w in words.windows(2) {
					self.observe(w[0].clone(), &w[1]);
				}
			}
			ModelOrder::Trigram => {
				self.observe(format!("{START_TOKEN} {}", words[0]), &words[1]);
				*self.starts.entry(words[0].clone()).or_insert(0) += 1;
				for w in words.windows(3) {
					self.observe(format!("{} {}", w[0], w[1]), &w[2]);
				}
			}
		}
	}

	/// Predicts the next word by weighted random sampling.
	///
	/// The last `order - 1` tokens of `context` (lowercased) form the
	/// lookup key; each candidate's probability is its count over the
	/// context's total. An unseen or too-short context returns the
	/// model's fallback token, never an error.
	pub fn predict(&self, context: &[&str]) -> String {
		let Some(key) = self.context_key(context) else {
			return self.fallback.token();
		};
		match self.transitions.get(&key).and_then(State::predict) {
			Some(next) => next,
			None => self.fallback.token(),
		}
	}

	/// Predicts the most frequent next word for the context.
	///
	/// Candidates tied for the maximum count are resolved uniformly at
	/// random among exactly the tied set. Unseen contexts return the
	/// fallback token, as with `predict`.
	pub fn predict_frequent(&self, context: &[&str]) -> String {
		let Some(key) = self.context_key(context) else {
			return self.fallback.token();
		};
		match self.transitions.get(&key).and_then(State::predict_frequent) {
			Some(next) => next,
			None => self.fallback.token(),
		}
	}

	/// Samples a sentence-opening word.
	///
	/// Trigram models draw from their start table; bigram models draw
	/// from the sentinel context. Both use the same weighted algorithm.
	/// Returns `None` on an empty model.
	pub fn random_start(&self) -> Option<String> {
		match self.order {
			ModelOrder::Bigram => self.transitions.get(START_TOKEN).and_then(State::predict),
			ModelOrder::Trigram => state::weighted_pick(&self.starts),
		}
	}

	/// Generates a word sequence by looping `predict`.
	///
	/// Starts from `seed` (lowercased) or, without one, from
	/// `random_start`. Each prediction is fed back as context until a
	/// terminator or empty fallback appears or `max_words` is reached.
	/// Returns the space-joined sequence; empty when the model has
	/// nothing to start from.
	pub fn predict_sequence(&self, seed: Option<&str>, max_words: usize) -> String {
		let mut words: Vec<String> = Vec::new();

		match seed {
			Some(s) => words.push(s.to_lowercase()),
			None => match self.random_start() {
				Some(w) => words.push(w),
				None => return String::new(),
			},
		}

		while words.len() < max_words {
			let next = if self.order == ModelOrder::Trigram && words.len() == 1 {
				// No preceding pair yet; the sentinel completes it.
				self.predict(&[START_TOKEN, &words[0]])
			} else {
				let context: Vec<&str> = words.iter().map(String::as_str).collect();
				self.predict(&context)
			};

			if next.is_empty() || next == "." {
				break;
			}
			words.push(next);
		}

		words.join(" ")
	}

	/// Merges another model of the same order into this one.
	///
	/// Transition and start counts are summed; the other model is left
	/// untouched. Fallback policy stays as configured on `self`.
	///
	/// # Errors
	/// `OrderMismatch` when the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<(), TextModelError> {
		if self.order != other.order {
			return Err(TextModelError::OrderMismatch {
				left: self.order,
				right: other.order,
			});
		}

		for (key, state) in &other.transitions {
			if let Some(existing) = self.transitions.get_mut(key) {
				existing.merge(state);
			} else {
				self.transitions.insert(key.clone(), state.clone());
			}
		}

		for (word, count) in &other.starts {
			*self.starts.entry(word.clone()).or_insert(0) += *count;
		}

		Ok(())
	}

	/// Number of times the context was observed during learning.
	///
	/// Equals the sum of all next-word counts for that context.
	pub fn observations(&self, context: &[&str]) -> usize {
		self.context_key(context)
			.and_then(|key| self.transitions.get(&key))
			.map_or(0, State::observations)
	}

	/// Occurrence count of one (context, next) transition.
	pub fn transition_count(&self, context: &[&str], next: &str) -> usize {
		self.context_key(context)
			.and_then(|key| self.transitions.get(&key))
			.map_or(0, |state| state.transition_count(next))
	}

	/// How many sentences opened with `word` (trigram models only;
	/// always 0 for bigrams).
	pub fn start_count(&self, word: &str) -> usize {
		self.starts.get(word).copied().unwrap_or(0)
	}

	/// Builds the lookup key from the last `order - 1` context tokens.
	fn context_key(&self, context: &[&str]) -> Option<String> {
		let len = self.order.context_len();
		if context.len() < len {
			return None;
		}

		let tail = &context[context.len() - len..];
		Some(
			tail.iter()
				.map(|word| word.to_lowercase())
				.collect::<Vec<_>>()
				.join(" "),
		)
	}

	fn observe(&mut self, key: String, next: &str) {
		let state = self
			.transitions
			.entry(key.clone())
			.or_insert_with(|| State::new(&key));
		state.add_transition(next);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn learned_bigram() -> NGramModel {
		let mut model = NGramModel::bigram();
		model.learn("the cat sat. the cat ran.").unwrap();
		model
	}

	#[test]
	fn bigram_counts_match_corpus() {
		let model = learned_bigram();

		assert_eq!(model.transition_count(&["the"], "cat"), 2);
		assert_eq!(model.transition_count(&["cat"], "sat"), 1);
		assert_eq!(model.transition_count(&["cat"], "ran"), 1);
		assert_eq!(model.transition_count(&[START_TOKEN], "the"), 2);
	}

	#[test]
	fn observations_conserve_totals() {
		let model = learned_bigram();

		assert_eq!(model.observations(&["the"]), 2);
		assert_eq!(model.observations(&["cat"]), 2);
		assert_eq!(model.observations(&[START_TOKEN]), 2);
		assert_eq!(model.observations(&["never"]), 0);
	}

	#[test]
	fn bigram_prediction_samples_both_continuations() {
		let model = learned_bigram();

		let mut sat = 0usize;
		let mut ran = 0usize;
		for _ in 0..2_000 {
			match model.predict(&["cat"]).as_str() {
				"sat" => sat += 1,
				"ran" => ran += 1,
				other => panic!("unexpected word: {other}"),
			}
		}

		// Counts are 1:1; both must appear with roughly equal frequency.
		assert!(sat > 500, "sat predicted {sat} times");
		assert!(ran > 500, "ran predicted {ran} times");
	}

	#[test]
	fn context_lookup_is_lowercased() {
		let model = learned_bigram();
		assert_eq!(model.predict(&["THE"]), "cat");
	}

	#[test]
	fn longer_context_uses_its_tail() {
		let model = learned_bigram();
		assert_eq!(model.predict(&["sat", "down", "the"]), "cat");
	}

	#[test]
	fn unseen_context_returns_fallback() {
		let bigram = learned_bigram();
		assert_eq!(bigram.predict(&["zebra"]), "");
		assert_eq!(bigram.predict_frequent(&["zebra"]), "");

		let mut trigram = NGramModel::trigram();
		trigram.learn("the cat sat on the mat.").unwrap();
		assert_eq!(trigram.predict(&["zebra", "crossing"]), ".");
	}

	#[test]
	fn too_short_context_returns_fallback() {
		let mut trigram = NGramModel::trigram();
		trigram.learn("the cat sat on the mat.").unwrap();
		assert_eq!(trigram.predict(&["cat"]), ".");
		assert_eq!(trigram.predict(&[]), ".");
	}

	#[test]
	fn fallback_policy_is_overridable() {
		let mut model = learned_bigram();
		model.set_fallback(Fallback::Terminator);
		assert_eq!(model.predict(&["zebra"]), ".");
	}

	#[test]
	fn trigram_learns_sentinel_and_starts() {
		let mut model = NGramModel::trigram();
		model.learn("the cat sat on the mat. the dog barked loudly.").unwrap();

		assert_eq!(model.transition_count(&[START_TOKEN, "the"], "cat"), 1);
		assert_eq!(model.transition_count(&[START_TOKEN, "the"], "dog"), 1);
		assert_eq!(model.transition_count(&["the", "cat"], "sat"), 1);
		assert_eq!(model.transition_count(&["sat", "on"], "the"), 1);
		assert_eq!(model.start_count("the"), 2);
	}

	#[test]
	fn short_sentences_are_skipped_silently() {
		let mut model = NGramModel::bigram();
		model.learn("hi. the cat sat.").unwrap();

		// "hi" is below the bigram window and leaves no trace.
		assert_eq!(model.transition_count(&[START_TOKEN], "hi"), 0);
		assert_eq!(model.transition_count(&[START_TOKEN], "the"), 1);
	}

	#[test]
	fn empty_input_is_an_error() {
		let mut bigram = NGramModel::bigram();
		assert_eq!(
			bigram.learn("hi"),
			Err(TextModelError::InsufficientInput { need: 2, got: 1 })
		);

		let mut trigram = NGramModel::trigram();
		assert_eq!(
			trigram.learn("hi there"),
			Err(TextModelError::InsufficientInput { need: 3, got: 2 })
		);
		assert!(trigram.learn("").is_err());
	}

	#[test]
	fn random_start_draws_learned_openers() {
		let mut trigram = NGramModel::trigram();
		trigram.learn("the cat sat on the mat. a dog barked at noon.").unwrap();
		for _ in 0..50 {
			let start = trigram.random_start().unwrap();
			assert!(start == "the" || start == "a", "unexpected opener: {start}");
		}

		let bigram = learned_bigram();
		assert_eq!(bigram.random_start().unwrap(), "the");

		assert_eq!(NGramModel::trigram().random_start(), None);
	}

	#[test]
	fn sequence_follows_a_single_chain() {
		let mut bigram = NGramModel::bigram();
		bigram.learn("alpha beta gamma delta.").unwrap();
		assert_eq!(bigram.predict_sequence(Some("alpha"), 10), "alpha beta gamma delta");

		let mut trigram = NGramModel::trigram();
		trigram.learn("alpha beta gamma delta.").unwrap();
		assert_eq!(trigram.predict_sequence(None, 10), "alpha beta gamma delta");
	}

	#[test]
	fn sequence_stops_at_max_words() {
		let mut model = NGramModel::bigram();
		model.learn("a b a b a b a b.").unwrap();
		let sequence = model.predict_sequence(Some("a"), 3);
		assert_eq!(sequence.split_whitespace().count(), 3);
	}

	#[test]
	fn merge_sums_transitions_and_starts() {
		let mut left = NGramModel::trigram();
		left.learn("the cat sat on mats.").unwrap();
		let mut right = NGramModel::trigram();
		right.learn("the cat ran off quickly.").unwrap();

		left.merge(&right).unwrap();

		assert_eq!(left.transition_count(&["the", "cat"], "sat"), 1);
		assert_eq!(left.transition_count(&["the", "cat"], "ran"), 1);
		assert_eq!(left.observations(&["the", "cat"]), 2);
		assert_eq!(left.start_count("the"), 2);
	}

	#[test]
	fn merge_rejects_order_mismatch() {
		let mut bigram = learned_bigram();
		let trigram = NGramModel::trigram();
		assert_eq!(
			bigram.merge(&trigram),
			Err(TextModelError::OrderMismatch {
				left: ModelOrder::Bigram,
				right: ModelOrder::Trigram,
			})
		);
	}
}
