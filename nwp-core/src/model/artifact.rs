use serde::{Deserialize, Serialize};

use super::sequence_model::DenseModel;
use super::vocabulary::Vocabulary;
use crate::error::{Error, Result};

/// Bundle persisted after training and loaded once at start-up.
///
/// `max_len` is the length of the training sequences (context + next word),
/// so the model consumes `max_len - 1` indices.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Artifact {
	pub model: DenseModel,
	pub vocabulary: Vocabulary,
	pub max_len: usize,
}

impl Artifact {
	/// Number of indices given to the model.
	pub fn context_window(&self) -> usize {
		self.max_len.saturating_sub(1)
	}

	/// Checks that the three parts agree with each other.
	///
	/// # Errors
	/// - `max_len < 2`
	/// - model input length differs from `max_len - 1`
	/// - model output cannot address every vocabulary index
	pub fn validate(&self) -> Result<()> {
		self.model.validate()?;

		if self.max_len < 2 {
			return Err(Error::InvalidArtifact(format!("max_len must be at least 2, got {}", self.max_len)));
		}
		if self.model.input_len() != self.context_window() {
			return Err(Error::InvalidArtifact(format!(
				"model consumes {} indices but max_len is {}",
				self.model.input_len(),
				self.max_len
			)));
		}
		if self.model.output_size() <= self.vocabulary.max_index() {
			return Err(Error::InvalidArtifact(format!(
				"model outputs {} probabilities but the vocabulary uses index {}",
				self.model.output_size(),
				self.vocabulary.max_index()
			)));
		}
		Ok(())
	}
}
