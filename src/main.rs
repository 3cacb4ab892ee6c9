mod config;
mod fallback;
mod formatting;
mod model;
mod prompt;
mod web;

use actix_files as fs;
use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use anyhow::Context;
use log::{error, info};
use std::sync::Arc;
use tera::Tera;

use config::AppConfig;
use model::{GeminiModel, TextGenerator};
use web::routes;

// App state structure
pub struct AppState {
    tera: Tera,
    generator: Arc<dyn TextGenerator>,
}

fn load_templates() -> anyhow::Result<Tera> {
    let mut tera = Tera::new("templates/**/*").context("Template parsing error")?;
    tera.autoescape_on(vec![".html"]);
    Ok(tera)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting {}", prompt::SERVICE_NAME);

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let tera = match load_templates() {
        Ok(t) => t,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let generator: Arc<dyn TextGenerator> = Arc::new(GeminiModel::new(&config));

    let app_state = Data::new(AppState { tera, generator });

    info!("Listening on {}:{}", config.host, config.port);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/static", "./static"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
