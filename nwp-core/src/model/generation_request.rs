use crate::error::{Error, Result};

/// Upper bound on the number of words a single request may ask for.
pub const DEFAULT_MAX_WORDS: usize = 50;

/// Number of words generated when the caller does not say.
pub const DEFAULT_WORD_COUNT: usize = 10;

/// Validated input of a generation call.
///
/// # Invariants
/// - `seed_text` is trimmed and not empty
/// - `word_count` is in `1..=max_words` (as given at construction)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
	seed_text: String,
	word_count: usize,
}

impl GenerationRequest {
	/// Creates a request bounded by `DEFAULT_MAX_WORDS`.
	pub fn new(seed_text: &str, word_count: usize) -> Result<Self> {
		Self::with_max_words(seed_text, word_count, DEFAULT_MAX_WORDS)
	}

	/// Creates a request bounded by `max_words`.
	///
	/// # Errors
	/// - `Error::EmptySeed` if the trimmed seed is empty
	/// - `Error::InvalidWordCount` if `word_count` is 0 or above `max_words`
	pub fn with_max_words(seed_text: &str, word_count: usize, max_words: usize) -> Result<Self> {
		let seed_text = seed_text.trim();
		if seed_text.is_empty() {
			return Err(Error::EmptySeed);
		}
		if word_count == 0 || word_count > max_words {
			return Err(Error::InvalidWordCount { got: word_count, max: max_words });
		}
		Ok(Self { seed_text: seed_text.to_owned(), word_count })
	}

	pub fn seed_text(&self) -> &str {
		&self.seed_text
	}

	pub fn word_count(&self) -> usize {
		self.word_count
	}
}
