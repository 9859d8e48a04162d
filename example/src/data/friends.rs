use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Friend {
    pub name: String,
    pub online: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct FriendList {
    pub friends: Vec<Friend>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct OnlineFriends {
    pub number: u32,
}
