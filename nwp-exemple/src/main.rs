use std::path::PathBuf;

use nwp_core::io::{build_output_path, load_artifact, read_file, save_artifact};
use nwp_core::model::artifact::Artifact;
use nwp_core::model::generation_request::GenerationRequest;
use nwp_core::model::generator::Generator;
use nwp_core::model::sequence_model::DenseModel;
use nwp_core::model::tokenizer::TokenizerRule;
use nwp_core::model::vocabulary::Vocabulary;

const BUILTIN_CORPUS: [&str; 6] = [
    "the sun rises over the quiet hills",
    "the river runs under the old stone bridge",
    "a quiet morning is a gift",
    "the old man walks to the river every morning",
    "birds sing over the hills when the sun rises",
    "every bridge has a story",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional corpus file, one sentence per line.
    // Without it the built-in corpus is used and the artifact goes to ./data/demo.bin
    let (corpus, artifact_path) = match std::env::args().nth(1) {
        Some(path) => (read_file(&path)?, build_output_path(&path, "bin")?),
        None => (
            BUILTIN_CORPUS.iter().map(|s| s.to_string()).collect(),
            PathBuf::from("./data/demo.bin"),
        ),
    };

    // Vocabulary built with the default rule (lowercase, punctuation removed)
    let vocabulary = Vocabulary::fit(TokenizerRule::default(), &corpus);
    println!("Vocabulary: {} words", vocabulary.len());

    // Longest sentence gives max_len, as when the sequences were prepared for training
    let max_len = corpus
        .iter()
        .map(|line| vocabulary.encode(line).len())
        .max()
        .unwrap_or(0)
        .max(2);

    // Untrained weights: the output is grammatical nonsense, but reproducible
    let model = DenseModel::seeded(max_len - 1, vocabulary.len() + 1, 16, 2024)?;

    save_artifact(&artifact_path, &Artifact { model, vocabulary, max_len })?;

    // Load it back the way a front-end would
    let generator = Generator::from_artifact(load_artifact(&artifact_path)?)?;
    println!("Context window: {}", generator.context_window());

    for seed in ["The sun", "an unknown seed", "old stone"] {
        let request = GenerationRequest::new(seed, 8)?;
        let generation = generator.predict(&request);
        println!(
            "{:>16} -> {} [{} words, {}]",
            seed, generation.text, generation.words_generated, generation.stop
        );
    }

    // Invalid requests are rejected before generation
    match GenerationRequest::new("   ", 5) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {e}"),
    }
    match GenerationRequest::new("the sun", 0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Rejected: {e}"),
    }

    Ok(())
}
