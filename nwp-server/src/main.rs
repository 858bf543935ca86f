use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

use nwp_core::io::load_artifact;
use nwp_core::model::generation_request::{GenerationRequest, DEFAULT_MAX_WORDS, DEFAULT_WORD_COUNT};
use nwp_core::model::generator::Generator;

/// Header carrying the reason the generation stopped.
const STOP_REASON_HEADER: &str = "X-Stop-Reason";

/// Command line / environment configuration.
#[derive(Parser, Debug)]
#[command(name = "nwp-server", about = "HTTP front-end for next-word generation")]
struct Config {
	/// Artifact produced by training (model, vocabulary, max_len).
	#[arg(long, env = "NWP_ARTIFACT", default_value = "./data/model.bin")]
	artifact: PathBuf,

	#[arg(long, env = "NWP_HOST", default_value = "127.0.0.1")]
	host: String,

	#[arg(long, env = "NWP_PORT", default_value_t = 5000)]
	port: u16,

	/// Maximum number of words a request may ask for.
	#[arg(long, env = "NWP_MAX_WORDS", default_value_t = DEFAULT_MAX_WORDS)]
	max_words: usize,

	/// Worker threads, one per CPU by default.
	#[arg(long, env = "NWP_WORKERS")]
	workers: Option<usize>,
}

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	text: Option<String>,
	num_words: Option<usize>,
}

/// Loaded once before the server starts, then only read.
struct SharedData {
	generator: Generator,
	max_words: usize,
}

/// HTTP GET endpoint `/v1/generate`
///
/// Continues `text` with up to `num_words` words.
/// The generated text is the response body; the stop reason is in `X-Stop-Reason`.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let text = query.text.as_deref().unwrap_or_default();
	let num_words = query.num_words.unwrap_or(DEFAULT_WORD_COUNT);

	let request = match GenerationRequest::with_max_words(text, num_words, data.max_words) {
		Ok(r) => r,
		Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
	};

	let generation = data.generator.predict(&request);
	info!(
		"Generated {}/{} words ({})",
		generation.words_generated,
		request.word_count(),
		generation.stop
	);

	HttpResponse::Ok()
		.insert_header((STOP_REASON_HEADER, generation.stop.as_str()))
		.body(generation.text)
}

/// HTTP GET endpoint `/v1/model`
///
/// Plain-text summary of the loaded artifact.
#[get("/v1/model")]
async fn get_model(data: web::Data<SharedData>) -> impl Responder {
	let generator = &data.generator;
	HttpResponse::Ok().body(format!(
		"vocabulary: {}\ncontext_window: {}\nmax_words: {}",
		generator.vocabulary().len(),
		generator.context_window(),
		data.max_words
	))
}

/// Registers the endpoints; shared with the tests.
fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated).service(get_model);
}

/// Main entry point for the server.
///
/// Loads the artifact once, shares the generator read-only between
/// workers and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = Config::parse();
	if config.max_words == 0 {
		warn!("max_words is 0, every generation request will be rejected");
	}

	let generator = load_artifact(&config.artifact)
		.and_then(Generator::from_artifact)
		.map_err(|e| std::io::Error::other(format!("Failed to load {}: {e}", config.artifact.display())))?;

	let shared_data = web::Data::new(SharedData { generator, max_words: config.max_words });
	let workers = config.workers.unwrap_or_else(num_cpus::get).max(1);

	info!("Listening on {}:{} with {workers} workers", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.workers(workers)
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
