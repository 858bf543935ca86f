use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::model::artifact::Artifact;

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/corpus.txt` + `"bin"` → `data/corpus.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Loads and validates an artifact serialized with `postcard`.
///
/// # Errors
/// I/O failure, malformed bytes, or an inconsistent artifact.
pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<Artifact> {
	let bytes = fs::read(&path)?;
	let artifact: Artifact = postcard::from_bytes(&bytes)?;
	artifact.validate()?;
	info!(
		"Loaded artifact {} ({} words, context window {})",
		path.as_ref().display(),
		artifact.vocabulary.len(),
		artifact.context_window()
	);
	Ok(artifact)
}

/// Serializes an artifact with `postcard`, creating parent directories if needed.
pub fn save_artifact<P: AsRef<Path>>(path: P, artifact: &Artifact) -> Result<()> {
	let path = path.as_ref();
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent)?;
	}
	let bytes = postcard::to_stdvec(artifact)?;
	fs::write(path, bytes)?;
	info!("Saved artifact {}", path.display());
	Ok(())
}
