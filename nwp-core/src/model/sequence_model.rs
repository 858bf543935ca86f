use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A model predicting the next word index from a fixed-length index sequence.
///
/// Implementations must be deterministic for a given input and safe to
/// share between threads: the generator only ever reads them.
pub trait SequenceModel: Send + Sync {
	/// Returns a probability for every index of the output space.
	///
	/// # Panics
	/// May panic if `sequence` does not have the length the model was built for.
	fn predict(&self, sequence: &[usize]) -> Vec<f32>;

	/// Sequence length the model requires, if it has a fixed one.
	fn expected_input_len(&self) -> Option<usize> {
		None
	}

	/// Length of the probability vector, if known ahead of a prediction.
	fn output_len(&self) -> Option<usize> {
		None
	}
}

impl<M: SequenceModel + ?Sized> SequenceModel for Box<M> {
	fn predict(&self, sequence: &[usize]) -> Vec<f32> {
		(**self).predict(sequence)
	}

	fn expected_input_len(&self) -> Option<usize> {
		(**self).expected_input_len()
	}

	fn output_len(&self) -> Option<usize> {
		(**self).output_len()
	}
}

/// Feed-forward next-word model.
///
/// Layers:
/// - embedding lookup for each of the `input_len` positions
/// - flatten to `input_len * embedding_dim` features
/// - dense layer to `output_size` logits
/// - softmax
///
/// # Invariants
/// - `embedding.len() == output_size * embedding_dim`
/// - `weights.len() == output_size * input_len * embedding_dim`
/// - `bias.len() == output_size`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DenseModel {
	input_len: usize,
	output_size: usize,
	embedding_dim: usize,

	/// Row-major `output_size x embedding_dim`, one row per index.
	embedding: Vec<f32>,

	/// Row-major `output_size x (input_len * embedding_dim)`.
	weights: Vec<f32>,

	bias: Vec<f32>,
}

impl DenseModel {
	/// Creates a model from explicit parameters.
	///
	/// # Errors
	/// Returns an error if a dimension is zero or a parameter buffer
	/// does not match the dimensions.
	pub fn new(
		input_len: usize,
		output_size: usize,
		embedding_dim: usize,
		embedding: Vec<f32>,
		weights: Vec<f32>,
		bias: Vec<f32>,
	) -> Result<Self> {
		let model = Self { input_len, output_size, embedding_dim, embedding, weights, bias };
		model.validate()?;
		Ok(model)
	}

	/// Creates a model with reproducible random parameters in `[-0.5, 0.5)`.
	///
	/// Only meant for demos and tests: the weights are not trained.
	pub fn seeded(input_len: usize, output_size: usize, embedding_dim: usize, seed: u64) -> Result<Self> {
		let (embedding_len, weights_len) = Self::parameter_lens(input_len, output_size, embedding_dim)?;

		let mut rng = StdRng::seed_from_u64(seed);
		let mut random = |len: usize| -> Vec<f32> { (0..len).map(|_| rng.random_range(-0.5..0.5)).collect() };

		let embedding = random(embedding_len);
		let weights = random(weights_len);
		let bias = random(output_size);
		Self::new(input_len, output_size, embedding_dim, embedding, weights, bias)
	}

	/// Expected `(embedding, weights)` buffer lengths for the given dimensions.
	///
	/// Dimensions may come from an untrusted file, so products are checked.
	fn parameter_lens(input_len: usize, output_size: usize, embedding_dim: usize) -> Result<(usize, usize)> {
		if input_len == 0 || output_size == 0 || embedding_dim == 0 {
			return Err(Error::InvalidModel(format!(
				"dimensions must be positive, got input_len={input_len}, output_size={output_size}, embedding_dim={embedding_dim}"
			)));
		}

		let embedding_len = output_size.checked_mul(embedding_dim);
		let weights_len = embedding_len.and_then(|len| len.checked_mul(input_len));
		match (embedding_len, weights_len) {
			(Some(embedding_len), Some(weights_len)) => Ok((embedding_len, weights_len)),
			_ => Err(Error::InvalidModel(format!(
				"dimensions overflow: input_len={input_len}, output_size={output_size}, embedding_dim={embedding_dim}"
			))),
		}
	}

	/// Checks the shape invariants.
	///
	/// Called on construction and after loading an artifact.
	pub fn validate(&self) -> Result<()> {
		let (embedding_len, weights_len) = Self::parameter_lens(self.input_len, self.output_size, self.embedding_dim)?;

		let expected = [
			("embedding", self.embedding.len(), embedding_len),
			("weights", self.weights.len(), weights_len),
			("bias", self.bias.len(), self.output_size),
		];
		for (name, got, want) in expected {
			if got != want {
				return Err(Error::InvalidModel(format!("{name} has {got} values, expected {want}")));
			}
		}
		Ok(())
	}

	/// Length of the sequence the model consumes.
	pub fn input_len(&self) -> usize {
		self.input_len
	}

	/// Length of the probability vector, i.e. the number of indices the model can choose.
	pub fn output_size(&self) -> usize {
		self.output_size
	}

	fn features(&self, sequence: &[usize]) -> Vec<f32> {
		let mut features = Vec::with_capacity(self.input_len * self.embedding_dim);
		for &index in sequence {
			assert!(index < self.output_size, "index {index} outside of the embedding table ({})", self.output_size);
			let start = index * self.embedding_dim;
			features.extend_from_slice(&self.embedding[start..start + self.embedding_dim]);
		}
		features
	}
}

impl SequenceModel for DenseModel {
	fn expected_input_len(&self) -> Option<usize> {
		Some(self.input_len)
	}

	fn output_len(&self) -> Option<usize> {
		Some(self.output_size)
	}

	fn predict(&self, sequence: &[usize]) -> Vec<f32> {
		assert_eq!(
			sequence.len(),
			self.input_len,
			"model expects {} indices, got {}",
			self.input_len,
			sequence.len()
		);

		let features = self.features(sequence);
		let width = features.len();

		let logits: Vec<f32> = self
			.weights
			.chunks_exact(width)
			.zip(&self.bias)
			.map(|(row, bias)| row.iter().zip(&features).map(|(w, x)| w * x).sum::<f32>() + bias)
			.collect();

		softmax(&logits)
	}
}

/// Numerically stable softmax.
fn softmax(logits: &[f32]) -> Vec<f32> {
	let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
	let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
	let sum: f32 = exps.iter().sum();
	exps.into_iter().map(|e| e / sum).collect()
}
