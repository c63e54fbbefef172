use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum JoblyError {
    #[error("Failed to read config file, {}", source)]
    ReadConfigFile { source: std::io::Error },

    #[error("Failed to parse config file, {}", source)]
    ParseConfigFile { source: toml::de::Error },

    #[error("Secret is required")]
    MissingSecret {},

    #[error("Failed to create database directory, {}", source)]
    CreateDatabaseDir { source: std::io::Error },

    #[error("Failed to read context")]
    ReadContext {},

    #[error("Missing bearer token")]
    MissingToken {},

    #[error("Failed to authenticate request, {}", source)]
    Authenticate { source: jsonwebtoken::errors::Error },

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("{}", message)]
    InvalidInput { message: String },

    #[error("{}", message)]
    DuplicateEntity { message: String },

    #[error("{}", message)]
    NotFound { message: String },

    #[error("Failed to run database migrations, {}", source)]
    Migrate { source: refinery::Error },

    #[error("Database query failed, {}", source)]
    BackendFailure { source: rusqlite::Error },

    #[error("Database actor is unavailable, {}", source)]
    Mailbox { source: actix::MailboxError },
}

impl JoblyError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        JoblyError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        JoblyError::NotFound {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for JoblyError {
    fn from(source: rusqlite::Error) -> Self {
        JoblyError::BackendFailure { source }
    }
}

impl From<actix::MailboxError> for JoblyError {
    fn from(source: actix::MailboxError) -> Self {
        JoblyError::Mailbox { source }
    }
}

impl actix_web::error::ResponseError for JoblyError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            debug!("Request rejected: {}", self);
        }

        HttpResponseBuilder::new(status)
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .body(
                json!({
                    "error": { "message": self.to_string(), "status": status.as_u16() }
                })
                .to_string(),
            )
    }

    fn status_code(&self) -> StatusCode {
        match self {
            JoblyError::InvalidInput { .. } | JoblyError::DuplicateEntity { .. } => {
                StatusCode::BAD_REQUEST
            }
            JoblyError::NotFound { .. } => StatusCode::NOT_FOUND,
            JoblyError::MissingToken {}
            | JoblyError::Authenticate { .. }
            | JoblyError::Unauthorized {} => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
