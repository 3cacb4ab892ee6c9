use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::web::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),
    #[error("El servicio no está configurado correctamente. Contacta con el administrador.")]
    ServiceConfig,
    #[error("Lo siento, ocurrió un error interno. Por favor, inténtalo de nuevo más tarde.")]
    Internal,
}

impl ChatError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ChatError::Validation(_) => "validation_error",
            ChatError::ServiceConfig => "api_error",
            ChatError::Internal => "internal_error",
        }
    }
}

impl ResponseError for ChatError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::ServiceConfig | ChatError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            error_type: self.error_type().to_string(),
        })
    }
}
