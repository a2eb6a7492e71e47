use std::collections::HashMap;

use rand::Rng;

use serde::{Deserialize, Serialize};


/// Represents a single context of the frequency model.
///
/// A `State` corresponds to a fixed tuple of `chain_len - 1` tokens (`key`)
/// and stores all observed continuations of this context together with
/// their occurrence counts.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate continuation occurrences during training
/// - Sample the next token using weighted random sampling
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct State {
	/// Identifier of the state (the context tuple, `chain_len - 1` tokens).
	key: Vec<String>,
	/// Outgoing transitions indexed by the next token.
	/// The value represents how many times this transition was observed.
	/// Example: { "cat" => 2, "dog" => 1 }
	transitions: HashMap<String, usize>
}

impl State {
	/// Creates a new empty state for the given context.
	pub fn new(key: &[String]) -> Self {
		Self {
			key: key.to_vec(),
			transitions: HashMap::new(),
		}
	}

	/// The context tuple this state belongs to.
	pub fn key(&self) -> &[String] {
		&self.key
	}

	/// Read-only view of the continuation counts.
	pub fn counts(&self) -> &HashMap<String, usize> {
		&self.transitions
	}

	/// Records an occurrence of a transition toward `next_token`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, next_token: &str) {
		*self.transitions.entry(next_token.to_owned()).or_insert(0) += 1;
	}

	/// Samples the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count.
	///
	/// This method performs:
	/// - an O(n) scan over the transitions
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` if the state has no transitions.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<String> {
		if self.transitions.is_empty() {
			return None;
		}

		// Compute the total number of occurrences
		let total: usize = self.transitions.values().sum();
		if total == 0 {
			// Should not happen due to invariants, but kept for safety
			return None;
		}

		// Randomly select a token
		let mut r = rng.random_range(0..total);

		let mut fallback: Option<&String> = None;
		for (next_token, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(next_token.clone());
			}
			r -= occurrence;
			fallback = Some(next_token);
		}

		// Fallback: should not happen, but kept for safety.
		fallback.cloned()
	}
}
