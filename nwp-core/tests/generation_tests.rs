use std::sync::Mutex;

use nwp_core::model::generation_request::GenerationRequest;
use nwp_core::model::generator::{Generator, StopReason};
use nwp_core::model::sequence_model::{DenseModel, SequenceModel};
use nwp_core::model::tokenizer::TokenizerRule;
use nwp_core::model::vocabulary::Vocabulary;

/// Always puts the highest probability on `index`.
struct FixedModel {
	index: usize,
	output_size: usize,
}

impl SequenceModel for FixedModel {
	fn predict(&self, _sequence: &[usize]) -> Vec<f32> {
		let mut probabilities = vec![0.01; self.output_size];
		probabilities[self.index] = 0.9;
		probabilities
	}
}

/// Replays a list of choices and records every input it receives.
struct ScriptedModel {
	choices: Vec<usize>,
	output_size: usize,
	inputs: Mutex<Vec<Vec<usize>>>,
}

impl ScriptedModel {
	fn new(choices: Vec<usize>, output_size: usize) -> Self {
		Self { choices, output_size, inputs: Mutex::new(Vec::new()) }
	}

	fn inputs(&self) -> Vec<Vec<usize>> {
		self.inputs.lock().unwrap().clone()
	}
}

impl SequenceModel for ScriptedModel {
	fn predict(&self, sequence: &[usize]) -> Vec<f32> {
		let mut inputs = self.inputs.lock().unwrap();
		let choice = self.choices[inputs.len() % self.choices.len()];
		inputs.push(sequence.to_vec());

		let mut probabilities = vec![0.0; self.output_size];
		probabilities[choice] = 1.0;
		probabilities
	}
}

fn vocabulary() -> Vocabulary {
	Vocabulary::from_word_index(TokenizerRule::default(), [("i", 1), ("am", 2), ("happy", 3)]).unwrap()
}

#[test]
fn reference_example() {
	let generator = Generator::new(vocabulary(), FixedModel { index: 3, output_size: 4 }, 3).unwrap();
	let generation = generator.generate("i am", 1);
	assert_eq!(generation.text, "i am happy");
	assert_eq!(generation.words_generated, 1);
	assert_eq!(generation.stop, StopReason::Completed);
}

#[test]
fn zero_words_returns_trimmed_seed() {
	let generator = Generator::new(vocabulary(), FixedModel { index: 3, output_size: 4 }, 3).unwrap();
	let generation = generator.generate("  i am happy ", 0);
	assert_eq!(generation.text, "i am happy");
	assert_eq!(generation.words_generated, 0);
	assert_eq!(generation.stop, StopReason::Completed);
}

#[test]
fn in_vocabulary_run_appends_exactly_n_words() {
	let generator = Generator::new(vocabulary(), ScriptedModel::new(vec![1, 2, 3], 4), 3).unwrap();
	let generation = generator.generate("happy", 7);
	assert_eq!(generation.stop, StopReason::Completed);
	assert_eq!(generation.words_generated, 7);
	assert_eq!(generation.text.split(' ').count(), 1 + 7);
	assert_eq!(generation.text, "happy i am happy i am happy i");
}

#[test]
fn unknown_seed_stops_with_empty_vocabulary_match() {
	let model = ScriptedModel::new(vec![3], 4);
	let generator = Generator::new(vocabulary(), model, 3).unwrap();
	for word_count in [0, 1, 5] {
		let generation = generator.generate(" hello there ", word_count);
		assert_eq!(generation.text, "hello there");
		assert_eq!(generation.words_generated, 0);
		assert_eq!(generation.stop, StopReason::EmptyVocabularyMatch);
	}
	assert!(generator.model().inputs().is_empty());
}

#[test]
fn unknown_index_stops_after_previous_words() {
	// Index 0 is padding, 7 is outside the vocabulary: both decode to nothing
	for unknown in [0, 7] {
		let generator = Generator::new(vocabulary(), ScriptedModel::new(vec![3, 1, unknown, 2], 8), 3).unwrap();
		let generation = generator.generate("i am", 10);
		assert_eq!(generation.text, "i am happy i");
		assert_eq!(generation.words_generated, 2);
		assert_eq!(generation.stop, StopReason::UnknownDecodedIndex);
		assert_eq!(generator.model().inputs().len(), 3);
	}
}

#[test]
fn generation_is_deterministic() {
	let generator = Generator::new(vocabulary(), FixedModel { index: 2, output_size: 4 }, 3).unwrap();
	assert_eq!(generator.generate("i", 5), generator.generate("i", 5));
}

#[test]
fn context_is_left_padded_then_truncated() {
	let generator = Generator::new(vocabulary(), ScriptedModel::new(vec![3, 1, 2, 3], 4), 3).unwrap();
	generator.generate("i", 4);

	let inputs = generator.model().inputs();
	assert_eq!(
		inputs,
		vec![
			vec![0, 0, 1],
			vec![0, 1, 3],
			vec![1, 3, 1],
			vec![3, 1, 2],
		]
	);
	assert!(inputs.iter().all(|input| input.len() == generator.context_window()));
}

#[test]
fn accumulated_text_is_re_encoded_each_step() {
	// Unknown words in the seed are dropped at every step, not only at the start
	let generator = Generator::new(vocabulary(), ScriptedModel::new(vec![2], 4), 2).unwrap();
	let generation = generator.generate("I, the happy one", 2);
	assert_eq!(generation.text, "I, the happy one am am");
	assert_eq!(generator.model().inputs(), vec![vec![1, 3], vec![3, 2]]);
}

#[test]
fn ties_go_to_the_lowest_index() {
	struct FlatModel;
	impl SequenceModel for FlatModel {
		fn predict(&self, _sequence: &[usize]) -> Vec<f32> {
			vec![0.0, 0.25, 0.25, 0.25]
		}
	}

	let generator = Generator::new(vocabulary(), FlatModel, 3).unwrap();
	assert_eq!(generator.generate("am", 2).text, "am i i");
}

#[test]
fn predict_runs_a_validated_request() {
	let generator = Generator::new(vocabulary(), FixedModel { index: 3, output_size: 4 }, 3).unwrap();
	let request = GenerationRequest::new("  i am ", 2).unwrap();
	let generation = generator.predict(&request);
	assert_eq!(generation.text, "i am happy happy");
}

#[test]
fn boxed_models_can_be_used() {
	let model: Box<dyn SequenceModel> = Box::new(FixedModel { index: 1, output_size: 4 });
	let generator = Generator::new(vocabulary(), model, 3).unwrap();
	assert_eq!(generator.generate("am", 1).text, "am i");
}

#[test]
fn zero_context_window_is_rejected() {
	assert!(Generator::new(vocabulary(), FixedModel { index: 1, output_size: 4 }, 0).is_err());
}

#[test]
fn dense_model_must_fit_the_context_window() {
	let model = DenseModel::seeded(2, 4, 2, 1).unwrap();
	assert!(Generator::new(vocabulary(), model, 3).is_err());
}

#[test]
fn dense_model_must_address_every_vocabulary_index() {
	let model = DenseModel::seeded(3, 3, 2, 1).unwrap();
	assert!(Generator::new(vocabulary(), model, 3).is_err());

	let boxed: Box<dyn SequenceModel> = Box::new(DenseModel::seeded(3, 3, 2, 1).unwrap());
	assert!(Generator::new(vocabulary(), boxed, 3).is_err());

	let model = DenseModel::seeded(3, 4, 2, 1).unwrap();
	assert!(Generator::new(vocabulary(), model, 3).is_ok());
}

#[test]
fn generator_is_shareable_between_threads() {
	let generator = Generator::new(vocabulary(), FixedModel { index: 3, output_size: 4 }, 3).unwrap();
	std::thread::scope(|scope| {
		let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| generator.generate("i am", 2).text)).collect();
		for handle in handles {
			assert_eq!(handle.join().unwrap(), "i am happy happy");
		}
	});
}
