use serde::{Deserialize, Serialize};

/// Characters removed from the text before splitting.
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Rule used to split a text into words.
///
/// The same rule must be used to build the vocabulary and to encode
/// the text given to the generator, so it is persisted with the vocabulary.
///
/// # Behavior
/// - Lowercases the text if `lower` is set
/// - Replaces every character of `filters` with `split`
/// - Splits on `split` and drops empty pieces
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenizerRule {
	/// Characters replaced by the split character.
	pub filters: String,

	/// Whether the text is lowercased first.
	pub lower: bool,

	/// Word separator.
	pub split: char,
}

impl Default for TokenizerRule {
	fn default() -> Self {
		Self { filters: DEFAULT_FILTERS.to_owned(), lower: true, split: ' ' }
	}
}

impl TokenizerRule {
	/// Splits `text` into words.
	///
	/// UTF-8 safe: filtering works on characters, not bytes.
	pub fn words(&self, text: &str) -> Vec<String> {
		let text = if self.lower { text.to_lowercase() } else { text.to_owned() };

		let cleaned: String = text
			.chars()
			.map(|c| if self.filters.contains(c) { self.split } else { c })
			.collect();

		cleaned
			.split(self.split)
			.filter(|word| !word.is_empty())
			.map(str::to_owned)
			.collect()
	}
}
