use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::State;
use crate::error::ModelError;

/// Frequency model mapping contexts to weighted next-token counts.
///
/// The `FrequencyModel` stores one `State` per observed context (an ordered
/// tuple of `chain_len - 1` tokens) and is the sole artifact passed between
/// training and generation. It also carries `chain_len` itself, since
/// generation cannot proceed without knowing the context length used at
/// training time.
///
/// # Responsibilities
/// - Accumulate (context, next-token) observations during training
/// - Sample a next token for an exactly matching context
/// - Round-trip losslessly through its serialized form
///
/// # Invariants
/// - `chain_len` is always >= 1
/// - Each key in `states` is a unique context of length `chain_len - 1`
/// - Empty states are never stored; every recorded count is >= 1
///
/// # Lifecycle
/// Created empty, populated incrementally by the trainer in a single pass,
/// serialized once, then treated as read-only by the generator.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FrequencyModel {
	/// The chain length (context length + 1).
	chain_len: usize, // must be >= 1

	/// Mapping from a context (length chain_len - 1) to its state.
	states: HashMap<Vec<String>, State>,
}

impl FrequencyModel {
	/// Creates a new empty frequency model for chains of length `chain_len`.
	///
	/// # Errors
	/// Returns `ModelError::InvalidChainLength` if `chain_len` is zero.
	pub fn new(chain_len: usize) -> Result<Self, ModelError> {
		if chain_len == 0 {
			return Err(ModelError::InvalidChainLength);
		}
		Ok(Self { chain_len, states: HashMap::new() })
	}

	/// The chain length the model was trained with.
	pub fn chain_len(&self) -> usize {
		self.chain_len
	}

	/// The length of every context key (`chain_len - 1`).
	pub fn context_len(&self) -> usize {
		self.chain_len - 1
	}

	/// Number of distinct contexts in the model.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// True if the model has no recorded contexts.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Records one observation of `next_token` following `context`.
	///
	/// The state for `context` is created on first observation, so empty
	/// states never exist in the map.
	pub fn record(&mut self, context: &[String], next_token: &str) {
		debug_assert_eq!(context.len(), self.context_len());
		self.states
			.entry(context.to_vec())
			.or_insert_with(|| State::new(context))
			.add_transition(next_token);
	}

	/// Samples a next token for an exactly matching context, weighted by
	/// occurrence count.
	///
	/// Returns `None` if the context was never observed.
	pub fn sample_next<R: Rng>(&self, context: &[String], rng: &mut R) -> Option<String> {
		self.states.get(context)?.sample(rng)
	}

	/// Read-only view of the continuation counts for a context.
	///
	/// Returns `None` if the context was never observed.
	pub fn next_counts(&self, context: &[String]) -> Option<&HashMap<String, usize>> {
		self.states.get(context).map(State::counts)
	}

	/// Iterates over all stored contexts.
	pub fn contexts(&self) -> impl Iterator<Item = &[String]> {
		self.states.values().map(State::key)
	}

	/// Serializes the model to compact bytes.
	pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Deserializes a model previously produced by `to_bytes`.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
		Ok(postcard::from_bytes(bytes)?)
	}

	/// Writes the serialized model to `path`.
	///
	/// # Notes
	/// - Uses `postcard` for compact serialization, same format as `load`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}

	/// Loads a model from a file written by `save`.
	///
	/// # Errors
	/// - `ModelError::Io` if the file cannot be read.
	/// - `ModelError::Codec` if the bytes are not a valid model.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
		let bytes = std::fs::read(path)?;
		Self::from_bytes(&bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ctx(tokens: &[&str]) -> Vec<String> {
		tokens.iter().map(|t| t.to_string()).collect()
	}

	#[test]
	fn zero_chain_len_is_rejected() {
		assert!(matches!(
			FrequencyModel::new(0),
			Err(ModelError::InvalidChainLength)
		));
	}

	#[test]
	fn new_model_is_empty() {
		let model = FrequencyModel::new(2).unwrap();
		assert!(model.is_empty());
		assert_eq!(model.len(), 0);
		assert_eq!(model.context_len(), 1);
	}

	#[test]
	fn record_creates_and_increments() {
		let mut model = FrequencyModel::new(2).unwrap();
		model.record(&ctx(&["the"]), "cat");
		model.record(&ctx(&["the"]), "cat");
		model.record(&ctx(&["cat"]), "sat");

		assert_eq!(model.len(), 2);
		assert_eq!(model.next_counts(&ctx(&["the"])).unwrap().get("cat"), Some(&2));
		assert_eq!(model.next_counts(&ctx(&["cat"])).unwrap().get("sat"), Some(&1));
		assert_eq!(model.next_counts(&ctx(&["dog"])), None);
	}

	#[test]
	fn all_contexts_have_expected_length_and_positive_counts() {
		let mut model = FrequencyModel::new(3).unwrap();
		model.record(&ctx(&["a", "b"]), "c");
		model.record(&ctx(&["b", "c"]), "d");
		model.record(&ctx(&["a", "b"]), "d");

		for context in model.contexts() {
			assert_eq!(context.len(), model.context_len());
			for count in model.next_counts(context).unwrap().values() {
				assert!(*count >= 1);
			}
		}
	}

	#[test]
	fn bytes_round_trip_preserves_mapping() {
		let mut model = FrequencyModel::new(3).unwrap();
		model.record(&ctx(&["the", "cat"]), "sat");
		model.record(&ctx(&["the", "cat"]), "ran");
		model.record(&ctx(&["the", "cat"]), "sat");
		model.record(&ctx(&["cat", "sat"]), "down");

		let bytes = model.to_bytes().unwrap();
		let restored = FrequencyModel::from_bytes(&bytes).unwrap();

		assert_eq!(restored.chain_len(), model.chain_len());
		assert_eq!(restored.len(), model.len());
		for context in model.contexts() {
			assert_eq!(restored.next_counts(context), model.next_counts(context));
		}
	}

	#[test]
	fn save_and_load_round_trip() {
		let mut model = FrequencyModel::new(2).unwrap();
		model.record(&ctx(&["hello"]), "world");

		let path = std::env::temp_dir().join("markovgen-model-roundtrip.dat");
		model.save(&path).unwrap();
		let restored = FrequencyModel::load(&path).unwrap();
		std::fs::remove_file(&path).ok();

		assert_eq!(restored.chain_len(), 2);
		assert_eq!(
			restored.next_counts(&ctx(&["hello"])).unwrap().get("world"),
			Some(&1)
		);
	}

	#[test]
	fn load_rejects_garbage_bytes() {
		let path = std::env::temp_dir().join("markovgen-model-garbage.dat");
		std::fs::write(&path, b"not a model").unwrap();
		let result = FrequencyModel::load(&path);
		std::fs::remove_file(&path).ok();
		assert!(matches!(result, Err(ModelError::Codec(_))));
	}
}
