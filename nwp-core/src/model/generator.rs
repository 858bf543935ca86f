use std::fmt;

use log::debug;

use crate::error::{Error, Result};
use crate::model::artifact::Artifact;
use crate::model::generation_request::GenerationRequest;
use crate::model::sequence_model::{DenseModel, SequenceModel};
use crate::model::vocabulary::{PADDING_INDEX, Vocabulary};

/// Why a generation call stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
	/// All requested words were generated.
	Completed,

	/// The accumulated text contains no word known to the vocabulary.
	EmptyVocabularyMatch,

	/// The model chose an index no word maps to.
	UnknownDecodedIndex,
}

impl StopReason {
	/// Short identifier, used by the HTTP front-end.
	pub fn as_str(&self) -> &'static str {
		match self {
			StopReason::Completed => "completed",
			StopReason::EmptyVocabularyMatch => "empty-vocabulary-match",
			StopReason::UnknownDecodedIndex => "unknown-decoded-index",
		}
	}
}

impl fmt::Display for StopReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Result of a generation call.
///
/// Early stops are not failures: `text` always holds the trimmed seed
/// followed by every word generated before the stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
	pub text: String,
	pub words_generated: usize,
	pub stop: StopReason,
}

/// Greedy word-by-word generator.
///
/// # Responsibilities
/// - Re-encode the whole accumulated text at every step
/// - Keep the last `context_window` indices and left-pad them with `PADDING_INDEX`
/// - Pick the most probable index and decode it back to a word
/// - Stop on an empty encoding, an unknown index, or after `word_count` words
///
/// Only borrowed immutably once built, so one instance can serve
/// concurrent callers without locking.
#[derive(Debug)]
pub struct Generator<M = DenseModel> {
	vocabulary: Vocabulary,
	model: M,
	context_window: usize,
}

impl Generator<DenseModel> {
	/// Builds a generator from a loaded artifact.
	///
	/// # Errors
	/// Returns an error if the artifact is inconsistent (see `Artifact::validate`).
	pub fn from_artifact(artifact: Artifact) -> Result<Self> {
		artifact.validate()?;
		let context_window = artifact.context_window();
		Self::new(artifact.vocabulary, artifact.model, context_window)
	}
}

impl<M: SequenceModel> Generator<M> {
	/// Creates a generator.
	///
	/// # Errors
	/// - `context_window` is 0
	/// - the model declares an input length other than `context_window`
	/// - the model declares an output too short to address every vocabulary index
	pub fn new(vocabulary: Vocabulary, model: M, context_window: usize) -> Result<Self> {
		if context_window == 0 {
			return Err(Error::InvalidArtifact("context window must be at least 1".to_owned()));
		}
		if let Some(input_len) = model.expected_input_len() {
			if input_len != context_window {
				return Err(Error::InvalidArtifact(format!(
					"model consumes {input_len} indices but the context window is {context_window}"
				)));
			}
		}
		if let Some(output_len) = model.output_len() {
			if output_len <= vocabulary.max_index() {
				return Err(Error::InvalidArtifact(format!(
					"model outputs {output_len} probabilities but the vocabulary uses index {}",
					vocabulary.max_index()
				)));
			}
		}
		Ok(Self { vocabulary, model, context_window })
	}

	pub fn vocabulary(&self) -> &Vocabulary {
		&self.vocabulary
	}

	pub fn model(&self) -> &M {
		&self.model
	}

	/// Number of trailing indices given to the model (`max_len - 1`).
	pub fn context_window(&self) -> usize {
		self.context_window
	}

	/// Runs an already validated request.
	pub fn predict(&self, request: &GenerationRequest) -> Generation {
		self.generate(request.seed_text(), request.word_count())
	}

	/// Generates up to `word_count` words after `seed_text`.
	///
	/// # Behavior
	/// - The seed is trimmed.
	/// - A seed without any known word stops with `EmptyVocabularyMatch`,
	///   whatever `word_count` is.
	/// - The loop may stop before `word_count` words (see `StopReason`).
	///
	/// Deterministic: same seed, count, vocabulary and model give the same output.
	pub fn generate(&self, seed_text: &str, word_count: usize) -> Generation {
		let mut text = seed_text.trim().to_owned();

		if self.vocabulary.encode(&text).is_empty() {
			debug!("No known word in seed '{text}'");
			return Generation { text, words_generated: 0, stop: StopReason::EmptyVocabularyMatch };
		}

		for step in 0..word_count {
			let sequence = self.vocabulary.encode(&text);
			if sequence.is_empty() {
				return Generation { text, words_generated: step, stop: StopReason::EmptyVocabularyMatch };
			}

			let input = pad_context(&sequence, self.context_window);
			let probabilities = self.model.predict(&input);

			let word = argmax(&probabilities).and_then(|index| self.vocabulary.decode(index));
			match word {
				Some(word) => {
					debug!("Step {}: '{word}'", step + 1);
					text.push(' ');
					text.push_str(word);
				}
				None => {
					debug!("Step {}: no word for the predicted index, stopping", step + 1);
					return Generation { text, words_generated: step, stop: StopReason::UnknownDecodedIndex };
				}
			}
		}

		Generation { text, words_generated: word_count, stop: StopReason::Completed }
	}
}

/// Keeps the last `window` indices and left-pads with `PADDING_INDEX`.
///
/// The result always has exactly `window` elements.
pub fn pad_context(sequence: &[usize], window: usize) -> Vec<usize> {
	let tail = &sequence[sequence.len().saturating_sub(window)..];
	let mut padded = vec![PADDING_INDEX; window - tail.len()];
	padded.extend_from_slice(tail);
	padded
}

/// Index of the highest probability.
///
/// Ties go to the lowest index. NaN values are skipped, where a NumPy
/// `argmax` would return the first NaN; a softmax over finite logits
/// never produces one.
/// Returns `None` for an empty or all-NaN vector.
pub fn argmax(probabilities: &[f32]) -> Option<usize> {
	let mut best: Option<(usize, f32)> = None;
	for (index, &p) in probabilities.iter().enumerate() {
		if p.is_nan() {
			continue;
		}
		match best {
			Some((_, current)) if p <= current => (),
			_ => best = Some((index, p)),
		}
	}
	best.map(|(index, _)| index)
}
