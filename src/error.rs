use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Rejection kinds produced by the chain core. All of them are recoverable at
/// the HTTP boundary; none are fatal to the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("transaction is missing required field: {0}")]
    InvalidTransaction(&'static str),

    #[error("proof {0} has already been recorded in the chain")]
    DuplicateProof(u64),

    #[error("proof was mined against block {submitted}, but the head is now {current}")]
    StaleProof { submitted: u64, current: u64 },

    #[error("proof does not meet difficulty {0}")]
    InvalidProof(u32),
}

impl actix_web::ResponseError for ChainError {
    fn status_code(&self) -> StatusCode {
        match self {
            ChainError::InvalidTransaction(_) | ChainError::InvalidProof(_) => {
                StatusCode::BAD_REQUEST
            }
            ChainError::DuplicateProof(_) | ChainError::StaleProof { .. } => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}

pub type Result<T> = std::result::Result<T, ChainError>;
