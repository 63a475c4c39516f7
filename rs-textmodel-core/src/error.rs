use crate::model::ngram_model::ModelOrder;
use thiserror::Error;

/// Errors surfaced by models and the document index.
///
/// Everything here is synchronous and deterministic: retrying a failed
/// call with the same inputs and the same corpus state reproduces the
/// same error. Unknown generation contexts are NOT errors; `predict`
/// returns the model's fallback token instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextModelError {
	/// A document with this name is already indexed. The first document
	/// and its derived data stay untouched; pick a new name.
	#[error("document already exists: {0}")]
	DuplicateDocument(String),

	/// Bulk ingestion received fewer tokens in total than the model
	/// order requires. Individual short sentences are skipped silently;
	/// this fires only when the whole input is too small to learn from.
	#[error("input has {got} tokens, model needs at least {need}")]
	InsufficientInput { need: usize, got: usize },

	/// Two models of different orders cannot be merged.
	#[error("model order mismatch: {left:?} vs {right:?}")]
	OrderMismatch { left: ModelOrder, right: ModelOrder },
}
