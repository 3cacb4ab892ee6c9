use actix_web::{web, HttpResponse, Responder};
use chrono::{SecondsFormat, Utc};
use log::{error, info, warn};
use tera::Context;
use uuid::Uuid;

use crate::fallback;
use crate::formatting::format_response;
use crate::model::GenerationErrorKind;
use crate::prompt::{build_prompt, SERVICE_NAME};
use crate::web::error::ChatError;
use crate::web::models::{ChatRequest, ChatResponse, HealthResponse};
use crate::AppState;

// Index page handler
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let mut context = Context::new();
    context.insert("service", SERVICE_NAME);
    match data.tera.render("index.html", &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: SERVICE_NAME.to_string(),
    })
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ChatError> {
    let request_id = Uuid::new_v4();

    let message = match req.into_inner().message {
        Some(message) if !message.trim().is_empty() => message,
        _ => {
            warn!("Chat request {} rejected: empty message", request_id);
            return Err(ChatError::Validation(
                "El mensaje no puede estar vacío".to_string(),
            ));
        }
    };

    info!(
        "Chat request {}: {} characters",
        request_id,
        message.chars().count()
    );

    let prompt = build_prompt(&message);

    match data.generator.generate(&prompt).await {
        Ok(text) => {
            info!("Chat request {} answered", request_id);
            Ok(HttpResponse::Ok().json(ChatResponse::answer(format_response(&text))))
        }
        Err(e) => match e.kind {
            GenerationErrorKind::QuotaExceeded => {
                let rule = fallback::select(&message);
                warn!(
                    "Chat request {}: quota exceeded, serving {:?} fallback",
                    request_id, rule.category
                );
                Ok(HttpResponse::Ok().json(ChatResponse::quota_fallback(rule.response)))
            }
            GenerationErrorKind::Auth => {
                error!("Chat request {}: API key rejected: {}", request_id, e);
                Err(ChatError::ServiceConfig)
            }
            GenerationErrorKind::Blocked => {
                warn!("Chat request {}: content blocked: {}", request_id, e);
                Err(ChatError::Internal)
            }
            _ => {
                error!("Chat request {}: generation failed: {}", request_id, e);
                Err(ChatError::Internal)
            }
        },
    }
}
