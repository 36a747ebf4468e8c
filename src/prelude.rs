use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error, tagged with a machine-readable failure kind so
/// callers can pick behavior per kind instead of collapsing everything
/// to a boolean.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("backend unreachable: {0}")]
    Network(String),
    #[error("{0}")]
    Validation(String),
    #[error("not authorized: {0}")]
    Authorization(String),
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    Unknown(String),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Network(_) => "network",
            Error::Validation(_) => "validation",
            Error::Authorization(_) => "authorization",
            Error::NotFound => "not-found",
            Error::Unknown(_) => "unknown",
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e.to_string())
    }
}

impl From<askama::Error> for Error {
    fn from(e: askama::Error) -> Self {
        Error::Unknown(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Unknown(e.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Authorization(_) => StatusCode::UNAUTHORIZED,
            Error::Network(_) => StatusCode::BAD_GATEWAY,
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!("request failed ({}): {}", self.kind(), &self);
        let body = Html(format!(
            "<!doctype html><html><body><h1>{}</h1><p>{}</p></body></html>",
            status, self
        ));
        (status, body).into_response()
    }
}
