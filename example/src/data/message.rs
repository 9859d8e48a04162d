use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub contents: String,
}

/// Messages travel wrapped in a `{"message": ...}` object both ways.
#[derive(Deserialize, Serialize, Debug)]
pub struct MessageEnvelope {
    pub message: Message,
}
