mod data;
mod error;
mod messages_api_client;

pub use data::{Friend, Message};
pub use error::Error;
pub use messages_api_client::{MessagesApiClient, MessagesApiClientBuilder};
