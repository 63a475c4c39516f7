use std::mem;

/// Punctuation removed from the text wherever it appears.
///
/// A character from this set that sits between words leaves the
/// surrounding whitespace behind (later collapsed); one embedded in a
/// word is simply dropped. The pipe is in the set, so no real token can
/// ever collide with the start-of-sentence sentinel used by the models.
const STRIPPED: &[char] = &[
	',', ':', ';', '(', ')', '{', '}', '[', ']',
	'`', '~', '@', '#', '$', '%', '^', '&', '*', '\\', '|',
	'<', '>', '/', '"', '_', '-', '+', '=',
];

/// Sentence terminators. A run of these followed by whitespace (or the
/// end of input) collapses into a single sentence boundary.
const TERMINATORS: &[char] = &['.', '?', '!'];

/// Converts raw text into a cleaned, lowercase token stream.
///
/// # Behavior
/// - Whitespace runs (spaces, tabs, newlines) separate tokens.
/// - Characters from the stripped punctuation set are removed.
/// - Runs of `.`, `?`, `!` adjacent to whitespace or at the end of the
///   input become a single sentence boundary. A terminator embedded in a
///   word (`3.14`) is kept as part of the token.
/// - Every token is lowercased with `str::to_lowercase` (no locale
///   dependence); empty tokens are never produced.
///
/// # Parameters
/// - `segment`: when true, the result is one inner `Vec` per sentence,
///   with empty sentences discarded. When false, the whole input is a
///   single token stream (at most one inner `Vec`) and boundaries are
///   dropped.
///
/// # Notes
/// - Deterministic: identical input yields identical output.
/// - Idempotent: re-normalizing already-normalized text changes nothing.
/// - Sentences too short for a model order are NOT filtered here; the
///   models skip those silently during learning.
pub fn normalize(raw: &str, segment: bool) -> Vec<Vec<String>> {
	let chars: Vec<char> = raw.chars().collect();

	let mut sentences: Vec<Vec<String>> = Vec::new();
	let mut sentence: Vec<String> = Vec::new();
	let mut token = String::new();

	for (i, &c) in chars.iter().enumerate() {
		if c.is_whitespace() {
			flush_token(&mut token, &mut sentence);
			continue;
		}

		if STRIPPED.contains(&c) {
			continue;
		}

		if TERMINATORS.contains(&c) {
			// A terminator run reaching whitespace or the end of the
			// input marks a boundary; anything else stays in the token.
			let mut j = i + 1;
			while j < chars.len() && TERMINATORS.contains(&chars[j]) {
				j += 1;
			}
			if j >= chars.len() || chars[j].is_whitespace() {
				// Only the first terminator of the run acts; the rest
				// of the run lands here too and must not re-trigger.
				if i > 0 && TERMINATORS.contains(&chars[i - 1]) {
					continue;
				}
				flush_token(&mut token, &mut sentence);
				if segment {
					flush_sentence(&mut sentence, &mut sentences);
				}
				continue;
			}
		}

		for lowered in c.to_lowercase() {
			token.push(lowered);
		}
	}

	flush_token(&mut token, &mut sentence);
	flush_sentence(&mut sentence, &mut sentences);

	sentences
}

/// Flattened convenience over `normalize(raw, false)`: the whole input
/// as one token sequence.
pub fn tokens(raw: &str) -> Vec<String> {
	normalize(raw, false).into_iter().next().unwrap_or_default()
}

fn flush_token(token: &mut String, sentence: &mut Vec<String>) {
	if !token.is_empty() {
		sentence.push(mem::take(token));
	}
}

fn flush_sentence(sentence: &mut Vec<String>, sentences: &mut Vec<Vec<String>>) {
	if !sentence.is_empty() {
		sentences.push(mem::take(sentence));
	}
}
