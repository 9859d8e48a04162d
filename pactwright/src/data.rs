use crate::matchers::{Template, TextTemplate};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

pub const PACT_SPECIFICATION_VERSION: &str = "3.0.0";

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderState {
    pub name: String,
    pub params: Option<serde_json::Map<String, Value>>,
}

impl ProviderState {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: serde_json::Map<String, Value>) -> Self {
        self.params = Some(params);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub path: TextTemplate,
    pub query: Option<IndexMap<String, Vec<String>>>,
    pub headers: Option<IndexMap<String, TextTemplate>>,
    pub body: Option<Template>,
}

impl Request {
    pub fn new<S: Into<String>, P: Into<TextTemplate>>(method: S, path: P) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: None,
            headers: None,
            body: None,
        }
    }

    pub fn with_query_param<S1: Into<String>, S2: Into<String>>(
        mut self,
        name: S1,
        value: S2,
    ) -> Self {
        self.query
            .get_or_insert_with(IndexMap::new)
            .entry(name.into())
            .or_insert_with(Vec::new)
            .push(value.into());
        self
    }

    pub fn with_header<S: Into<String>, T: Into<TextTemplate>>(
        mut self,
        name: S,
        value: T,
    ) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body<T: Into<Template>>(mut self, body: T) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn without_matchers(&self) -> PlainRequest {
        PlainRequest {
            method: self.method.clone(),
            path: self.path.without_matchers().to_string(),
            query: self.query.clone(),
            headers: self.headers.as_ref().map(plain_headers),
            body: self.body.as_ref().map(Template::without_matchers),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Option<IndexMap<String, TextTemplate>>,
    pub body: Option<Template>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: None,
            body: None,
        }
    }

    pub fn with_header<S: Into<String>, T: Into<TextTemplate>>(
        mut self,
        name: S,
        value: T,
    ) -> Self {
        self.headers
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_body<T: Into<Template>>(mut self, body: T) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn without_matchers(&self) -> PlainResponse {
        PlainResponse {
            status: self.status,
            headers: self.headers.as_ref().map(plain_headers),
            body: self.body.as_ref().map(Template::without_matchers),
        }
    }
}

pub(crate) fn plain_headers(
    headers: &IndexMap<String, TextTemplate>,
) -> IndexMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| (name.clone(), value.without_matchers().to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlainRequest {
    pub method: String,
    pub path: String,
    pub query: Option<IndexMap<String, Vec<String>>>,
    pub headers: Option<IndexMap<String, String>>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlainResponse {
    pub status: u16,
    pub headers: Option<IndexMap<String, String>>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub description: String,
    pub request: Request,
    pub response: Response,
    pub provider_states: Option<Vec<ProviderState>>,
}

impl Interaction {
    pub fn new<S: Into<String>>(description: S, request: Request, response: Response) -> Self {
        Self {
            description: description.into(),
            request,
            response,
            provider_states: None,
        }
    }

    pub fn given(mut self, provider_state: ProviderState) -> Self {
        self.provider_states
            .get_or_insert_with(Vec::new)
            .push(provider_state);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pact {
    pub consumer_name: String,
    pub provider_name: String,
    pub interactions: Vec<Interaction>,
}

impl Pact {
    pub fn new<S1: Into<String>, S2: Into<String>>(consumer_name: S1, provider_name: S2) -> Self {
        Self {
            consumer_name: consumer_name.into(),
            provider_name: provider_name.into(),
            interactions: Vec::new(),
        }
    }

    pub fn add_interaction(&mut self, interaction: Interaction) {
        self.interactions.push(interaction);
    }

    pub fn pact_specification(&self) -> &'static str {
        PACT_SPECIFICATION_VERSION
    }
}

/// A request as the mock provider received it.
#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: String,
    pub path: String,
    pub query: IndexMap<String, Vec<String>>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

/// A canned response the mock provider sends back.
#[derive(Debug, Clone)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: IndexMap<String, String>,
    pub body: String,
}

/// A call made to the mock provider, paired with the interaction that served it.
#[derive(Debug, Clone)]
pub struct Call {
    pub request_data: RequestData,
    pub interaction: Interaction,
}
