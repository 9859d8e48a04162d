use crate::data::Call;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    Header {
        name: String,
        expected: String,
        actual: Option<String>,
    },
    Query {
        expected: IndexMap<String, Vec<String>>,
        actual: IndexMap<String, Vec<String>>,
    },
    Body {
        expected: Value,
        actual: Option<Value>,
    },
}

/// A call that reached the mock provider but didn't send what its interaction expects.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMismatch {
    pub description: String,
    pub kind: MismatchKind,
}

impl std::error::Error for RequestMismatch {}

impl Display for RequestMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            MismatchKind::Header {
                name,
                expected,
                actual,
            } => {
                let actual = match actual {
                    Some(value) => format!("\"{}\"", value),
                    None => "<no header value>".into(),
                };
                write!(
                    f,
                    "\"{}\": header \"{}\" differs. Expected \"{}\", got {}",
                    self.description, name, expected, actual
                )
            }
            MismatchKind::Query { expected, actual } => write!(
                f,
                "\"{}\": query differs. Expected {:?}, got {:?}",
                self.description, expected, actual
            ),
            MismatchKind::Body { expected, actual } => {
                let actual = match actual {
                    Some(value) => value.to_string(),
                    None => "<no body>".into(),
                };
                write!(
                    f,
                    "\"{}\": body differs. Expected {}, got {}",
                    self.description, expected, actual
                )
            }
        }
    }
}

/// Checks a received call against the matcher-free form of its interaction's request.
/// Expected headers only need to be present; query and body have to be equal.
pub fn validate_call(call: &Call) -> Result<(), RequestMismatch> {
    let expected = call.interaction.request.without_matchers();
    let actual = &call.request_data;
    let mismatch = |kind| RequestMismatch {
        description: call.interaction.description.clone(),
        kind,
    };

    if let Some(headers) = &expected.headers {
        for (name, value) in headers {
            let actual_value = actual
                .headers
                .iter()
                .find(|(actual_name, _)| actual_name.eq_ignore_ascii_case(name))
                .map(|(_, actual_value)| actual_value.clone());

            if actual_value.as_ref() != Some(value) {
                return Err(mismatch(MismatchKind::Header {
                    name: name.clone(),
                    expected: value.clone(),
                    actual: actual_value,
                }));
            }
        }
    }

    if let Some(query) = &expected.query {
        if query != &actual.query {
            return Err(mismatch(MismatchKind::Query {
                expected: query.clone(),
                actual: actual.query.clone(),
            }));
        }
    }

    if let Some(body) = &expected.body {
        if actual.body.as_ref() != Some(body) {
            return Err(mismatch(MismatchKind::Body {
                expected: body.clone(),
                actual: actual.body.clone(),
            }));
        }
    }

    Ok(())
}
