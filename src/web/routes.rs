use actix_web::{error::JsonPayloadError, web, HttpRequest};
use log::warn;

use crate::web::error::ChatError;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .route("/", web::get().to(handlers::index))
        .route("/chat", web::post().to(handlers::chat))
        .route("/health", web::get().to(handlers::health_check));
}

// Malformed bodies get the same JSON shape as an empty message
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected chat payload: {}", err);
    ChatError::Validation("El cuerpo de la petición debe ser JSON con un campo 'message'".to_string())
        .into()
}
