use serde_json::Value;
use std::{fmt::Display, io, path::PathBuf, string::FromUtf8Error};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictingField {
    Provider,
    Consumer,
    PactSpecification,
}

impl Display for ConflictingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictingField::Provider => write!(f, "provider"),
            ConflictingField::Consumer => write!(f, "consumer"),
            ConflictingField::PactSpecification => write!(f, "metadata.pactSpecification"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeConflict {
    pub field: ConflictingField,
    pub existing: Value,
    pub new: Value,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IoError: {0}")]
    IoError(#[from] io::Error),
    #[error("The existing pact file {} is not valid JSON: {source}", .path.display())]
    MalformedExistingFile {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("The existing pact file is not a pact document: {0}")]
    NotAPactDocument(&'static str),
    #[error(
        "Pact files can't be merged, {} differs. Existing: {}. New: {}",
        .0.field,
        .0.existing,
        .0.new
    )]
    MergeConflict(MergeConflict),
    #[error("Couldn't serialize the pact document: {0}")]
    SerializationError(serde_json::Error),
    #[error("The serialized pact document is not UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}
