use rand::Rng;
use rand::prelude::{IndexedRandom, IteratorRandom};

use super::frequency_model::FrequencyModel;
use crate::error::ModelError;

/// Generates token sequences by iterative sampling from a `FrequencyModel`.
///
/// The generator only reads the model; independent generation runs against
/// the same model are safe to run in parallel.
///
/// # Responsibilities
/// - Seed the output, either from a random context or from a caller-given
///   first token
/// - Sample one token per step from the trailing context
/// - Fall back to shorter contexts (backoff) when no exact match exists
///
/// # Sampling laws
/// - Exact context match: weighted by occurrence count.
/// - Backoff on a shorter prefix: uniform across matching contexts,
///   counts are ignored.
/// - Empty context: the first token of a uniformly chosen context.
pub struct Generator<'a> {
	model: &'a FrequencyModel,
}

impl<'a> Generator<'a> {
	/// Creates a generator reading from `model`.
	pub fn new(model: &'a FrequencyModel) -> Self {
		Self { model }
	}

	/// Generates a sequence of exactly `length` tokens.
	///
	/// # Parameters
	/// - `seed`: optional first token; when given, the starting context is
	///   chosen uniformly among contexts whose first token equals it.
	/// - `length`: target sequence length, the output is truncated to it
	///   even when the seeding context alone is longer.
	/// - `rng`: random source, injectable for reproducible runs.
	///
	/// # Errors
	/// - `ModelError::EmptyModel` if the model has no contexts.
	/// - `ModelError::SeedNotFound` if no context starts with `seed`.
	pub fn generate<R: Rng>(
		&self,
		seed: Option<&str>,
		length: usize,
		rng: &mut R,
	) -> Result<Vec<String>, ModelError> {
		if self.model.is_empty() {
			return Err(ModelError::EmptyModel);
		}

		let mut output = self.seed_context(seed, rng)?;
		while output.len() < length {
			match self.next_token(&output, rng) {
				Some(token) => output.push(token),
				// Cannot happen once the model is known to be non-empty
				None => return Err(ModelError::EmptyModel),
			}
		}
		output.truncate(length);
		Ok(output)
	}

	/// Picks the starting context for a generation run.
	///
	/// Without a seed, any stored context is equally likely. With a seed,
	/// only contexts whose first token equals the seed are considered.
	fn seed_context<R: Rng>(
		&self,
		seed: Option<&str>,
		rng: &mut R,
	) -> Result<Vec<String>, ModelError> {
		match seed {
			None => self
				.model
				.contexts()
				.choose(rng)
				.map(|context| context.to_vec())
				.ok_or(ModelError::EmptyModel),
			Some(token) => self
				.model
				.contexts()
				.filter(|context| context.first().map(String::as_str) == Some(token))
				.choose(rng)
				.map(|context| context.to_vec())
				.ok_or_else(|| ModelError::SeedNotFound(token.to_owned())),
		}
	}

	/// Samples the next token for the current output.
	///
	/// Starts from the trailing context (the last `chain_len - 1` output
	/// tokens, or fewer if the output is still shorter) and shrinks it by
	/// removing the oldest token until a match is found. Termination is
	/// bounded: the empty context is reached in at most `chain_len - 1`
	/// shrink steps, and at that point any non-empty model yields a token.
	///
	/// Returns `None` only for an empty model.
	fn next_token<R: Rng>(&self, output: &[String], rng: &mut R) -> Option<String> {
		let context_len = self.model.context_len();
		let mut body_len = output.len().min(context_len);

		loop {
			let body = &output[output.len() - body_len..];

			if body_len == context_len {
				// Exact match: weighted by occurrence counts
				if let Some(token) = self.model.sample_next(body, rng) {
					return Some(token);
				}
			} else if body_len > 0 {
				// Partial prefix match: every matching context contributes
				// the token right after the prefix, sampled uniformly
				let candidates: Vec<&String> = self
					.model
					.contexts()
					.filter(|context| context[..body_len] == *body)
					.map(|context| &context[body_len])
					.collect();
				if let Some(token) = candidates.choose(rng) {
					return Some((*token).clone());
				}
			} else {
				// Memoryless fallback: first token of a random context
				return self
					.model
					.contexts()
					.choose(rng)
					.and_then(|context| context.first().cloned());
			}

			if body_len == 0 {
				// Only possible when the model has no contexts at all
				return None;
			}
			body_len -= 1;
		}
	}
}
