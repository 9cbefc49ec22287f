use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::body::BoxBody;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::bson::ser::Error as BsonError;
use mongodb::error::Error as DatabaseError;
use serde::{Serialize, Serializer};

use crate::promotion::PromotionId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    ValidationFailed {
        message: String,
    },

    // 401
    Unauthorized,

    // 404
    PathNotFound,
    PromotionNotFound {
        promotion_id: PromotionId,
    },

    // 405
    MethodNotAllowed,

    // 409
    ConcurrentModificationDetected,

    // 415
    UnsupportedMediaType,

    // 500
    ExistentialState(String),
    InvalidConfiguration {
        key: &'static str,
        value: String,
    },
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Error {
        Error::ValidationFailed {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidQuery(_) => "E4001003",
            Error::ValidationFailed { .. } => "E4001004",
            Error::Unauthorized => "E4011000",
            Error::PathNotFound => "E4041000",
            Error::PromotionNotFound { .. } => "E4041001",
            Error::MethodNotAllowed => "E4051000",
            Error::ConcurrentModificationDetected => "E4091000",
            Error::UnsupportedMediaType => "E4151000",
            Error::ExistentialState(_) => "E5001000",
            Error::FailedDatabaseCall(_) => "E5001001",
            Error::FailedToSerializeToBson(_) => "E5001002",
            Error::IoError(_) => "E5001003",
            Error::InvalidConfiguration { .. } => "E5001004",
        }
    }

    pub fn error_message(&self) -> String {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed".into(),
            Error::InvalidPath(_) => "The given path could not be parsed".into(),
            Error::InvalidQuery(_) => "The given query could not be parsed".into(),
            Error::ValidationFailed { message } => message.clone(),
            Error::Unauthorized => "Invalid or missing token".into(),
            Error::PathNotFound => "The requested path was not found".into(),
            Error::PromotionNotFound { promotion_id } => {
                format!("Promotion with id '{}' was not found.", promotion_id)
            }
            Error::MethodNotAllowed => "The requested method is not allowed on this path".into(),
            Error::ConcurrentModificationDetected => {
                "The server detected a concurrent modification".into()
            }
            Error::UnsupportedMediaType => "Content-Type must be application/json".into(),
            Error::ExistentialState(_) => "The server detected an invalid state".into(),
            Error::InvalidConfiguration { key, .. } => {
                format!("The configured value of {} is invalid", key)
            }
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database".into()
            }
            Error::FailedToSerializeToBson(_) => {
                "An error occurred when serializing an object to bson".into()
            }
            Error::IoError(_) => "An error occurred during an I/O operation".into(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::PromotionNotFound { .. } => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::ConcurrentModificationDetected => StatusCode::CONFLICT,
            Error::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::ExistentialState(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidConfiguration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeToBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error_code: &'static str,
            error: &'static str,
            message: String,
            error_meta: &'a Error,
        }

        let status = self.status_code();
        HttpResponse::build(status).json(&Dummy {
            error_code: self.error_code(),
            error: status.canonical_reason().unwrap_or("Unknown"),
            message: self.error_message(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<JsonPayloadError> for Error {
    fn from(error: JsonPayloadError) -> Error {
        match error {
            JsonPayloadError::ContentType => Error::UnsupportedMediaType,
            error => Error::InvalidJson(error),
        }
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BsonError> for Error {
    fn from(error: BsonError) -> Error {
        Error::FailedToSerializeToBson(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedToSerializeToBson(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
