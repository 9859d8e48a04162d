mod call_validation;
mod data;
mod error;
mod matchers;
mod mock_provider;
pub mod pact_builder;
mod pact_configuration;
pub mod pact_file;
mod pact_session;
mod pact_storage;
mod runner;
mod util;

pub use call_validation::{MismatchKind, RequestMismatch};
pub use data::{
    Call, Interaction, Pact, PlainRequest, PlainResponse, ProviderState, Request, RequestData,
    Response, ResponseData, PACT_SPECIFICATION_VERSION,
};
pub use error::Error;
pub use matchers::{
    EachLike, InvalidMatcherConstruction, Matcher, RegexMatch, Template, TextTemplate,
};
pub use pact_builder::{build_pact_document, PactDocument};
pub use pact_configuration::{PactConfiguration, PACT_DIRECTORY_ENV};
pub use pact_file::{write_pact, WriteMode};
pub use pact_session::PactSession;
pub use pact_storage::{FilePactStorage, PactStorage};
pub use pactwright_codegen::pact_test;
pub use runner::{mock_provider_url, MOCK_PORT_ENV};
