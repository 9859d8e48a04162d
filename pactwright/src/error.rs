use crate::{call_validation::RequestMismatch, matchers::InvalidMatcherConstruction, pact_file};
use hyper::http;
use std::{io, sync};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid matcher: {0}")]
    InvalidMatcherConstruction(#[from] InvalidMatcherConstruction),
    #[error("Pact file error: {0}")]
    PactFileError(#[from] pact_file::Error),
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("The lock was poisoned")]
    PoisonedLock,
    #[error("The mock provider hasn't been configured")]
    NotConfigured,
    #[error("No interaction expects {method} {path}")]
    UnexpectedCall { method: String, path: String },
    #[error("{0}")]
    RequestMismatch(#[from] RequestMismatch),
    #[error("The status code {0} is invalid")]
    InvalidStatusCode(u16),
    #[error("Invalid header name")]
    InvalidHeaderName,
    #[error("Invalid header value")]
    InvalidHeaderValue,
    #[error("Invalid body: {0}")]
    InvalidBody(String),
    #[error("Hyper error: {0}")]
    HyperError(#[from] hyper::Error),
    #[error("Http Error: {0}")]
    HttpError(#[from] http::Error),
}

impl<T> From<sync::PoisonError<T>> for Error {
    fn from(_: sync::PoisonError<T>) -> Self {
        Error::PoisonedLock
    }
}

impl From<hyper::header::InvalidHeaderName> for Error {
    fn from(_: hyper::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<hyper::header::InvalidHeaderValue> for Error {
    fn from(_: hyper::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}
