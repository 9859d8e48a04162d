use crate::{
    data::{Friend, FriendList, Message, MessageEnvelope, OnlineFriends},
    error::Error,
};
use reqwest::blocking::RequestBuilder;
type ReqwestClient = reqwest::blocking::Client;

const DEFAULT_DOMAIN_NAME: &str = "http://localhost:8080";

/// Builder used to build a MessagesApiClient instance
#[derive(Debug, Clone, Default)]
pub struct MessagesApiClientBuilder {
    domain_name: Option<String>,
    http_client: Option<ReqwestClient>,
    token: Option<String>,
}

impl MessagesApiClientBuilder {
    /// Create a new MessagesApiClientBuilder instance.
    pub fn new() -> Self {
        Self {
            domain_name: None,
            http_client: None,
            token: None,
        }
    }

    /// Use the given domain_name when building a MessagesApiClient instance.
    ///
    /// # Arguments
    /// `domain_name` - a domain name to use when calling the API.
    ///
    /// # Returns
    /// This builder.
    pub fn with_domain_name<T: Into<String>>(mut self, domain_name: T) -> Self {
        self.domain_name = Some(domain_name.into());
        self
    }

    /// Use the given blocking reqwest client when building a MessagesApiClient instance.
    ///
    /// # Arguments
    /// `client` - a pre-configured blocking reqwest client.
    ///
    /// # Returns
    /// This builder.
    pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Send the given bearer token with every request.
    pub fn with_token<T: Into<String>>(mut self, token: T) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Consume the builder and create a MessagesApiClient instance using all of the previously
    /// configured values or their defaults.
    pub fn build(mut self) -> MessagesApiClient {
        MessagesApiClient {
            http: self.http_client.take().unwrap_or_default(),
            domain_name: self
                .domain_name
                .take()
                .unwrap_or_else(|| String::from(DEFAULT_DOMAIN_NAME)),
            token: self.token.take(),
        }
    }
}

/// Client of a small chat service: who is online, and sending messages to friends.
#[derive(Default, Debug, Clone)]
pub struct MessagesApiClient {
    http: ReqwestClient,
    domain_name: String,
    token: Option<String>,
}

impl MessagesApiClient {
    pub fn new() -> Self {
        MessagesApiClientBuilder::new().build()
    }

    /// Gets the number of friends currently online.
    pub fn online_friends(&self) -> Result<u32, Error> {
        let url = format!("{}/friends", self.domain_name);

        let online: OnlineFriends = self
            .authorize(self.http.get(&url).query(&[("status", "online")]))
            .send()?
            .error_for_status()?
            .json()?;

        Ok(online.number)
    }

    /// Gets every friend, online or not.
    pub fn friends(&self) -> Result<Vec<Friend>, Error> {
        let url = format!("{}/friends", self.domain_name);

        let list: FriendList = self
            .authorize(self.http.get(&url))
            .send()?
            .error_for_status()?
            .json()?;

        Ok(list.friends)
    }

    /// Sends a message to a friend.
    ///
    /// # Arguments
    /// `recipient` - the friend's handle, used as the path of the request.
    /// `contents` - the text of the message.
    ///
    /// # Returns
    /// The reply the service sent back.
    pub fn send_message<T: AsRef<str>, U: Into<String>>(
        &self,
        recipient: T,
        contents: U,
    ) -> Result<Message, Error> {
        let recipient = recipient.as_ref().trim();
        if recipient.is_empty() {
            return Err(Error::MissingRecipient);
        }

        let contents = contents.into();
        if contents.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let url = format!("{}/{}", self.domain_name, recipient);
        let envelope = MessageEnvelope {
            message: Message { contents },
        };

        let reply: MessageEnvelope = self
            .authorize(self.http.post(&url).json(&envelope))
            .send()?
            .error_for_status()?
            .json()?;

        Ok(reply.message)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
