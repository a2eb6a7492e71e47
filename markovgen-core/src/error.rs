use thiserror::Error;

/// Errors produced by model construction, persistence and generation.
///
/// # Notes
/// - Non-decodable corpus files are not represented here: they are
///   skipped during corpus collection and never reach the trainer.
/// - `EmptyModel` and `SeedNotFound` are the two ways a generation
///   request can find no matching context.
#[derive(Debug, Error)]
pub enum ModelError {
	/// The chain length must be a positive integer.
	#[error("chain length must be a positive integer")]
	InvalidChainLength,

	/// Generation was requested against a model with no recorded contexts.
	#[error("the model contains no contexts")]
	EmptyModel,

	/// The requested seed token never appears as the first token of a context.
	#[error("no context starts with seed token '{0}'")]
	SeedNotFound(String),

	/// Reading or writing a model file failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// The model file could not be encoded or decoded.
	#[error("invalid model data: {0}")]
	Codec(#[from] postcard::Error),
}
