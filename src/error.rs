use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Everything the registration endpoint can fail with. Storage errors are
/// classified structurally from the driver error, never by matching on
/// message text.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("server configuration is missing required settings")]
    ConfigurationMissing,
    #[error("validation failed")]
    ValidationFailed(ValidationErrors),
    #[error("email already exists")]
    Conflict,
    #[error("database connection failed")]
    ConnectionFailed(#[source] sqlx::Error),
    #[error("database schema not provisioned")]
    SchemaNotProvisioned(#[source] sqlx::Error),
    #[error("internal server error")]
    Unknown(#[source] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

/// Flattens `validator` output into a field/message list for the response.
pub fn validation_issues(errors: &ValidationErrors) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            issues.push(ValidationIssue {
                field: field.to_string(),
                message,
            });
        }
    }
    issues.sort_by(|a, b| a.field.cmp(&b.field));
    issues
}

impl From<sqlx::Error> for RegisterError {
    fn from(err: sqlx::Error) -> Self {
        // Postgres: 23505 = unique_violation, 42P01 = undefined_table.
        let code = match &err {
            sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
            _ => None,
        };
        match code.as_deref() {
            Some("23505") => return RegisterError::Conflict,
            Some("42P01") => return RegisterError::SchemaNotProvisioned(err),
            Some(_) => return RegisterError::Unknown(err.into()),
            None => {}
        }
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => RegisterError::ConnectionFailed(err),
            other => RegisterError::Unknown(other.into()),
        }
    }
}

impl ResponseError for RegisterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegisterError::ValidationFailed(_) | RegisterError::Conflict => {
                StatusCode::BAD_REQUEST
            }
            RegisterError::ConfigurationMissing
            | RegisterError::ConnectionFailed(_)
            | RegisterError::SchemaNotProvisioned(_)
            | RegisterError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "success": false,
            "message": self.to_string(),
        });

        match self {
            RegisterError::ValidationFailed(errors) => {
                body["details"] = json!(validation_issues(errors));
            }
            RegisterError::ConnectionFailed(source)
            | RegisterError::SchemaNotProvisioned(source) => {
                if cfg!(debug_assertions) {
                    body["error"] = json!(source.to_string());
                }
            }
            RegisterError::Unknown(source) => {
                if cfg!(debug_assertions) {
                    body["error"] = json!(source.to_string());
                }
            }
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    fn sample_validation_errors() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("email");
        err.message = Some("invalid email address".into());
        errors.add("email", err);
        errors.add("password", ValidationError::new("length"));
        errors
    }

    #[test]
    fn io_errors_classify_as_connection_failed() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RegisterError::from(sqlx::Error::Io(io));
        assert!(matches!(err, RegisterError::ConnectionFailed(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn pool_timeout_classifies_as_connection_failed() {
        let err = RegisterError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RegisterError::ConnectionFailed(_)));
    }

    #[test]
    fn row_not_found_classifies_as_unknown() {
        let err = RegisterError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RegisterError::Unknown(_)));
    }

    #[test]
    fn conflict_and_validation_map_to_bad_request() {
        assert_eq!(RegisterError::Conflict.status_code(), StatusCode::BAD_REQUEST);
        let err = RegisterError::ValidationFailed(sample_validation_errors());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RegisterError::ConfigurationMissing.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_issues_carry_field_and_message() {
        let issues = validation_issues(&sample_validation_errors());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "email");
        assert_eq!(issues[0].message, "invalid email address");
        assert_eq!(issues[1].field, "password");
        assert_eq!(issues[1].message, "length");
    }

    #[actix_web::test]
    async fn conflict_response_body_mentions_existing_email() {
        let resp = RegisterError::Conflict.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("already exists"));
    }

    #[actix_web::test]
    async fn validation_response_includes_details() {
        let err = RegisterError::ValidationFailed(sample_validation_errors());
        let resp = err.error_response();
        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(!body["details"].as_array().unwrap().is_empty());
    }
}
