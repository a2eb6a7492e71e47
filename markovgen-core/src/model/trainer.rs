use regex::Regex;

use super::frequency_model::FrequencyModel;
use crate::error::ModelError;

/// Streaming trainer accumulating a `FrequencyModel` from a line stream.
///
/// The trainer consumes lines one at a time, extracts word tokens and
/// records every sliding window of `chain_len` tokens as one
/// (context, next-token) observation. A carry-over buffer of residual line
/// text bridges line boundaries, since a window may span more than one
/// line read.
///
/// # Responsibilities
/// - Tokenize incoming text with a word-character scan (`\w+`)
/// - Apply optional lowercase normalization uniformly before tokenization
/// - Record every contiguous window of `chain_len` tokens
/// - Keep residual line text so windows can cross line boundaries
///
/// # Notes
/// - Lines are expected to include their trailing newline; the line
///   sources in `io` preserve it. The carry-over is a slice of raw line
///   text, not leftover tokens, so the newline is what prevents the last
///   token of one line from fusing with the first token of the next.
/// - A final remainder shorter than `chain_len` tokens contributes
///   nothing to the model.
pub struct Trainer {
	model: FrequencyModel,
	lowercase: bool,
	carry: String,
	word_pattern: Regex,
}

impl Trainer {
	/// Creates a trainer for chains of length `chain_len`.
	///
	/// If `lowercase` is set, all input text is lowercased before
	/// tokenization.
	///
	/// # Errors
	/// Returns `ModelError::InvalidChainLength` if `chain_len` is zero.
	pub fn new(chain_len: usize, lowercase: bool) -> Result<Self, ModelError> {
		Ok(Self {
			model: FrequencyModel::new(chain_len)?,
			lowercase,
			carry: String::new(),
			// The pattern is a constant, compilation cannot fail
			word_pattern: Regex::new(r"\w+").unwrap(),
		})
	}

	/// Feeds one line of raw text into the model.
	///
	/// # Behavior
	/// 1. Prepends the carry-over from the previous line.
	/// 2. Lowercases the combined text if normalization is enabled.
	/// 3. Extracts word tokens; non-word characters are delimiters and
	///    are discarded.
	/// 4. If fewer than `chain_len` tokens were found, the whole combined
	///    text is retained as carry-over and nothing is recorded.
	/// 5. Otherwise every window of `chain_len` consecutive tokens is
	///    recorded, and the last `chain_len - 1` characters of the
	///    combined text are kept as carry-over.
	pub fn feed_line(&mut self, line: &str) {
		let mut text = std::mem::take(&mut self.carry);
		text.push_str(line);
		if self.lowercase {
			text = text.to_lowercase();
		}

		let tokens: Vec<&str> = self
			.word_pattern
			.find_iter(&text)
			.map(|m| m.as_str())
			.collect();

		if tokens.len() < self.model.chain_len() {
			// Not enough tokens for a single window yet, keep everything
			self.carry = text;
			return;
		}

		let context_len = self.model.context_len();
		for window in tokens.windows(self.model.chain_len()) {
			let context: Vec<String> =
				window[..context_len].iter().map(|t| t.to_string()).collect();
			self.model.record(&context, window[context_len]);
		}

		self.carry = tail_chars(&text, context_len);
	}

	/// Drains a line iterator into the model.
	///
	/// # Errors
	/// Stops at the first I/O error reported by the line source.
	pub fn consume<I>(&mut self, lines: I) -> Result<(), ModelError>
	where
		I: IntoIterator<Item = std::io::Result<String>>,
	{
		for line in lines {
			self.feed_line(&line?);
		}
		Ok(())
	}

	/// Finishes the training pass and hands over the model.
	///
	/// Any residual carry-over shorter than `chain_len` tokens is dropped.
	pub fn into_model(self) -> FrequencyModel {
		log::debug!(
			"training pass finished: {} contexts (chain length {})",
			self.model.len(),
			self.model.chain_len()
		);
		self.model
	}
}

/// Returns the last `keep` characters of `text` (the whole text if it is
/// shorter than `keep` characters).
fn tail_chars(text: &str, keep: usize) -> String {
	if keep == 0 {
		return String::new();
	}
	match text.char_indices().rev().nth(keep - 1) {
		Some((idx, _)) => text[idx..].to_owned(),
		None => text.to_owned(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ctx(tokens: &[&str]) -> Vec<String> {
		tokens.iter().map(|t| t.to_string()).collect()
	}

	fn train_lines(lines: &[&str], chain_len: usize, lowercase: bool) -> FrequencyModel {
		let mut trainer = Trainer::new(chain_len, lowercase).unwrap();
		for line in lines {
			trainer.feed_line(line);
		}
		trainer.into_model()
	}

	#[test]
	fn bigram_counts_match_reference_corpus() {
		let model = train_lines(&["the cat sat. the cat ran.\n"], 2, true);

		let the = model.next_counts(&ctx(&["the"])).unwrap();
		assert_eq!(the.get("cat"), Some(&2));
		assert_eq!(the.len(), 1);

		let cat = model.next_counts(&ctx(&["cat"])).unwrap();
		assert_eq!(cat.get("sat"), Some(&1));
		assert_eq!(cat.get("ran"), Some(&1));
		assert_eq!(cat.len(), 2);
	}

	#[test]
	fn context_keys_have_length_chain_len_minus_one() {
		let model = train_lines(&["one two three four five six\n"], 4, false);
		assert!(!model.is_empty());
		for context in model.contexts() {
			assert_eq!(context.len(), 3);
		}
	}

	#[test]
	fn corpus_shorter_than_chain_len_yields_empty_model() {
		let model = train_lines(&["hi\n"], 3, false);
		assert!(model.is_empty());
	}

	#[test]
	fn lowercase_flag_normalizes_uniformly() {
		let model = train_lines(&["The Cat SAT\n"], 2, true);
		assert!(model.next_counts(&ctx(&["the"])).is_some());
		assert!(model.next_counts(&ctx(&["The"])).is_none());
	}

	#[test]
	fn without_lowercase_case_is_preserved() {
		let model = train_lines(&["The Cat\n"], 2, false);
		assert_eq!(
			model.next_counts(&ctx(&["The"])).unwrap().get("Cat"),
			Some(&1)
		);
	}

	#[test]
	fn newline_in_carry_over_separates_tokens_across_lines() {
		// The carry-over is raw line text, so for chain length 2 it is the
		// line's trailing newline and no window joins "cat" to "sat".
		let model = train_lines(&["the cat\n", "sat down\n"], 2, false);

		assert!(model.next_counts(&ctx(&["the"])).is_some());
		assert!(model.next_counts(&ctx(&["sat"])).is_some());
		assert!(model.next_counts(&ctx(&["cat"])).is_none());
	}

	#[test]
	fn short_line_is_retained_until_enough_tokens_arrive() {
		// The first read ends mid-token (no newline), so the retained text
		// fuses with the start of the next read.
		let model = train_lines(&["hel", "lo world\n"], 2, false);
		assert_eq!(
			model.next_counts(&ctx(&["hello"])).unwrap().get("world"),
			Some(&1)
		);
	}

	#[test]
	fn trailing_partial_remainder_is_dropped() {
		let model = train_lines(&["a b c\n", "d\n"], 3, false);
		// "d" alone can never complete a window once the pass ends
		let total: usize = model
			.contexts()
			.map(|c| model.next_counts(c).unwrap().values().sum::<usize>())
			.sum();
		assert_eq!(total, 1); // only (a, b) -> c
	}

	#[test]
	fn chain_len_one_records_unconditional_counts() {
		let model = train_lines(&["a b a\n"], 1, false);
		assert_eq!(model.context_len(), 0);
		let counts = model.next_counts(&[]).unwrap();
		assert_eq!(counts.get("a"), Some(&2));
		assert_eq!(counts.get("b"), Some(&1));
	}

	#[test]
	fn tokenization_is_idempotent() {
		let pattern = Regex::new(r"\w+").unwrap();
		let text = "the cat, sat... on -- the mat!\n";
		let tokens: Vec<&str> = pattern.find_iter(text).map(|m| m.as_str()).collect();
		let rejoined = tokens.join(" ");
		let again: Vec<&str> = pattern.find_iter(&rejoined).map(|m| m.as_str()).collect();
		assert_eq!(tokens, again);
	}

	#[test]
	fn zero_chain_len_is_rejected() {
		assert!(matches!(
			Trainer::new(0, false),
			Err(ModelError::InvalidChainLength)
		));
	}
}
