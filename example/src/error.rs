use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("A message needs a recipient")]
    MissingRecipient,
    #[error("A message can't be empty")]
    EmptyMessage,
    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}
