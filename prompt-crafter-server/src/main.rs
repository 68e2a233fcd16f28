use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use serde_json::json;
use prompt_crafter_core::{CrafterError, GenerationRequest, PromptCrafter};

mod config;

use config::ServerConfig;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	style: Option<String>,
	count: Option<usize>,
}

#[derive(Deserialize)]
struct SeedQuery {
	seed: Option<u64>,
}

/// Engine shared by every worker.
///
/// A single locked instance keeps the anti-repetition pools alive across
/// requests; a whole generation call runs under the lock.
struct SharedData {
	crafter: PromptCrafter,
}

/// Maps engine errors to HTTP responses.
///
/// Configuration errors are the caller's fault (unknown style, empty pool),
/// anything else is reported as a server error.
fn error_response(e: &CrafterError) -> HttpResponse {
	match e {
		CrafterError::Io(_) | CrafterError::Json(_) => HttpResponse::InternalServerError().body(e.to_string()),
		_ => HttpResponse::BadRequest().body(e.to_string()),
	}
}

/// Runs one generation request against the shared engine.
fn generate(data: &web::Data<Mutex<SharedData>>, config: &ServerConfig, request: &GenerationRequest) -> HttpResponse {
	if request.count > config.max_count {
		return HttpResponse::BadRequest().body(format!("count must be at most {}", config.max_count));
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	match shared_data.crafter.generate(request) {
		Ok(prompts) => HttpResponse::Ok().json(prompts),
		Err(e) => {
			tracing::warn!("Rejected request for style '{}': {}", request.style, e);
			error_response(&e)
		}
	}
}

/// Health check
#[get("/")]
async fn health() -> impl Responder {
	HttpResponse::Ok().json(json!({ "status": "healthy" }))
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `count` (default 1) prompt records for `style`.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<ServerConfig>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let style = match &query.style {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty style"),
	};
	let request = GenerationRequest::new(style, query.count.unwrap_or(1));
	generate(&data, &config, &request)
}

/// HTTP POST endpoint `/v1/text_to_style`
///
/// Body: `{"style": "...", "num_images": n}`.
#[post("/v1/text_to_style")]
async fn post_text_to_style(
	data: web::Data<Mutex<SharedData>>,
	config: web::Data<ServerConfig>,
	body: web::Json<GenerationRequest>,
) -> impl Responder {
	generate(&data, &config, &body)
}

#[get("/v1/styles")]
async fn get_styles(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};
	HttpResponse::Ok().json(shared_data.crafter.style_names())
}

#[get("/v1/categories")]
async fn get_categories(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};
	HttpResponse::Ok().json(shared_data.crafter.category_sizes())
}

/// HTTP PUT endpoint `/v1/seed`
///
/// Reseeds the engine; without `seed` a time-based seed is used.
#[put("/v1/seed")]
async fn put_seed(data: web::Data<Mutex<SharedData>>, query: web::Query<SeedQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};
	let seed = shared_data.crafter.set_seed(query.seed);
	HttpResponse::Ok().json(json!({ "seed": seed }))
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(health)
		.service(get_generated)
		.service(post_text_to_style)
		.service(get_styles)
		.service(get_categories)
		.service(put_seed);
}

/// Main entry point for the server.
///
/// Loads the engine from the data folder, wraps it in a `Mutex` and starts
/// an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	dotenvy::dotenv().ok();

	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "prompt_crafter_server=info,prompt_crafter_core=info,actix_web=info".into()),
		)
		.init();

	let config = ServerConfig::from_env();
	tracing::info!("Loading styles and categories from {}", config.data_dir.display());

	let mut crafter = PromptCrafter::from_folder(&config.data_dir).map_err(std::io::Error::other)?;
	if let Some(seed) = config.seed {
		crafter.set_seed(Some(seed));
	}

	let shared_model = web::Data::new(Mutex::new(SharedData { crafter }));
	let bind = (config.host.clone(), config.port);
	let shared_config = web::Data::new(config);

	tracing::info!("HTTP server listening on http://{}:{}", bind.0, bind.1);

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.app_data(shared_config.clone())
			.configure(routes)
	})
		.bind(bind)?
		.run()
		.await
}
