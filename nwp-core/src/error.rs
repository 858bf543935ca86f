use thiserror::Error;

/// Errors raised by `nwp-core`.
///
/// Early stops of the generation loop are not errors: they are reported
/// through [`StopReason`](crate::model::generator::StopReason).
#[derive(Debug, Error)]
pub enum Error {
	/// The seed text is empty once trimmed.
	#[error("Seed text cannot be empty")]
	EmptySeed,

	/// The requested number of words is outside `1..=max`.
	#[error("Number of words must be between 1 and {max}, got {got}")]
	InvalidWordCount { got: usize, max: usize },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] postcard::Error),

	#[error("Invalid vocabulary: {0}")]
	InvalidVocabulary(String),

	#[error("Invalid model: {0}")]
	InvalidModel(String),

	#[error("Invalid artifact: {0}")]
	InvalidArtifact(String),
}

pub type Result<T> = std::result::Result<T, Error>;
