//! Order-N Markov chain text modeling library.
//!
//! This crate provides the two halves of a statistical text generator:
//! - Training: a streaming pass converting raw text lines into a
//!   frequency model keyed by fixed-length contexts
//! - Generation: iterative sampling from a trained model, with context
//!   backoff when the exact context has no recorded continuation
//!
//! Corpus intake, persistence and error taxonomy live alongside them so a
//! front end only has to wire flags to calls.

/// Core model types and the training/generation algorithms.
pub mod model;

/// Corpus intake: line sources over a directory walk or standard input.
pub mod io;

/// Error taxonomy shared by the whole crate.
pub mod error;

pub use error::ModelError;
pub use model::frequency_model::FrequencyModel;
pub use model::generator::Generator;
pub use model::trainer::Trainer;
