mod friends;
mod message;

pub use friends::{Friend, FriendList, OnlineFriends};
pub use message::{Message, MessageEnvelope};
