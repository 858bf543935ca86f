use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tokenizer::TokenizerRule;
use crate::error::{Error, Result};

/// Index reserved for left-padding. No word ever maps to it.
pub const PADDING_INDEX: usize = 0;

/// Persisted form of a `Vocabulary`.
///
/// Only the forward mapping is stored, sorted by index; the inverse map
/// is rebuilt and validated when deserializing.
#[derive(Serialize, Deserialize)]
struct RawVocabulary {
	rule: TokenizerRule,
	word_index: Vec<(String, usize)>,
}

/// Bidirectional mapping between words and indices.
///
/// # Invariants
/// - Every word maps to a unique index `>= 1`
/// - `index_word` is the exact inverse of `word_index`
/// - Immutable once built
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawVocabulary", into = "RawVocabulary")]
pub struct Vocabulary {
	rule: TokenizerRule,
	word_index: HashMap<String, usize>,
	index_word: HashMap<usize, String>,
}

impl Vocabulary {
	/// Builds a vocabulary from explicit `(word, index)` pairs.
	///
	/// # Errors
	/// - An index equal to `PADDING_INDEX`
	/// - A word or an index present twice
	pub fn from_word_index<I, S>(rule: TokenizerRule, pairs: I) -> Result<Self>
	where
		I: IntoIterator<Item = (S, usize)>,
		S: Into<String>,
	{
		let mut word_index = HashMap::new();
		let mut index_word = HashMap::new();

		for (word, index) in pairs {
			let word = word.into();
			if index == PADDING_INDEX {
				return Err(Error::InvalidVocabulary(format!("word '{word}' uses the padding index {PADDING_INDEX}")));
			}
			if let Some(other) = index_word.get(&index) {
				return Err(Error::InvalidVocabulary(format!("index {index} used by both '{other}' and '{word}'")));
			}
			if word_index.contains_key(&word) {
				return Err(Error::InvalidVocabulary(format!("word '{word}' appears twice")));
			}
			word_index.insert(word.clone(), index);
			index_word.insert(index, word);
		}

		Ok(Self { rule, word_index, index_word })
	}

	/// Builds a vocabulary from a corpus.
	///
	/// Words are ordered by descending frequency, ties keeping their order
	/// of first appearance, and numbered from 1.
	pub fn fit<I, S>(rule: TokenizerRule, texts: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut counts: Vec<(String, usize)> = Vec::new();
		let mut positions: HashMap<String, usize> = HashMap::new();

		for text in texts {
			for word in rule.words(text.as_ref()) {
				match positions.get(&word) {
					Some(&position) => counts[position].1 += 1,
					None => {
						positions.insert(word.clone(), counts.len());
						counts.push((word, 1));
					}
				}
			}
		}

		// Stable sort: equal counts keep first-occurrence order
		counts.sort_by(|a, b| b.1.cmp(&a.1));

		let mut word_index = HashMap::with_capacity(counts.len());
		let mut index_word = HashMap::with_capacity(counts.len());
		for (i, (word, _)) in counts.into_iter().enumerate() {
			word_index.insert(word.clone(), i + 1);
			index_word.insert(i + 1, word);
		}

		Self { rule, word_index, index_word }
	}

	/// Encodes a text into word indices.
	///
	/// Words absent from the vocabulary are dropped silently.
	pub fn encode(&self, text: &str) -> Vec<usize> {
		self.rule
			.words(text)
			.iter()
			.filter_map(|word| self.word_index.get(word).copied())
			.collect()
	}

	/// Returns the word for `index`, or `None` if no word maps to it.
	pub fn decode(&self, index: usize) -> Option<&str> {
		self.index_word.get(&index).map(String::as_str)
	}

	/// Returns the index of `word`, if known.
	pub fn index_of(&self, word: &str) -> Option<usize> {
		self.word_index.get(word).copied()
	}

	/// Number of words.
	pub fn len(&self) -> usize {
		self.word_index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.word_index.is_empty()
	}

	/// Highest index in use, `PADDING_INDEX` when empty.
	pub fn max_index(&self) -> usize {
		self.index_word.keys().copied().max().unwrap_or(PADDING_INDEX)
	}

	/// Tokenization rule this vocabulary was built with.
	pub fn rule(&self) -> &TokenizerRule {
		&self.rule
	}
}

impl TryFrom<RawVocabulary> for Vocabulary {
	type Error = Error;

	fn try_from(raw: RawVocabulary) -> Result<Self> {
		Vocabulary::from_word_index(raw.rule, raw.word_index)
	}
}

impl From<Vocabulary> for RawVocabulary {
	fn from(vocabulary: Vocabulary) -> Self {
		let mut word_index: Vec<(String, usize)> = vocabulary.word_index.into_iter().collect();
		word_index.sort_by_key(|(_, index)| *index);
		Self { rule: vocabulary.rule, word_index }
	}
}
