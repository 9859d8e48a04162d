//! Turns a [`Pact`] into a Pact Specification v3 document.
//!
//! Building is pure: the same pact always yields an equal document, which is what lets the
//! file store deduplicate interactions across sessions.

pub mod matching_rules;

use crate::{
    data::{plain_headers, Interaction, Pact, ProviderState, Request, Response},
    matchers::Template,
};
use indexmap::IndexMap;
use matching_rules::{RuleGroup, RuleList};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PactDocument {
    pub provider: Participant,
    pub consumer: Participant,
    pub interactions: Vec<InteractionDocument>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub pact_specification: SpecificationVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificationVersion {
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionDocument {
    pub description: String,
    pub request: RequestDocument,
    pub response: ResponseDocument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_states: Option<Vec<ProviderStateDocument>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderStateDocument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDocument {
    pub method: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<IndexMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_rules: Option<MatchingRules>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDocument {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_rules: Option<MatchingRules>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<RuleList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<RuleGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RuleGroup>,
}

impl MatchingRules {
    fn into_option(self) -> Option<Self> {
        if self.path.is_none() && self.header.is_none() && self.body.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

pub fn build_pact_document(pact: &Pact) -> PactDocument {
    PactDocument {
        provider: Participant {
            name: pact.provider_name.clone(),
        },
        consumer: Participant {
            name: pact.consumer_name.clone(),
        },
        interactions: pact.interactions.iter().map(build_interaction).collect(),
        metadata: Metadata {
            pact_specification: SpecificationVersion {
                version: pact.pact_specification().to_string(),
            },
        },
    }
}

fn build_interaction(interaction: &Interaction) -> InteractionDocument {
    InteractionDocument {
        description: interaction.description.clone(),
        request: build_request(&interaction.request),
        response: build_response(&interaction.response),
        provider_states: interaction
            .provider_states
            .as_ref()
            .filter(|states| !states.is_empty())
            .map(|states| states.iter().map(build_provider_state).collect()),
    }
}

fn build_provider_state(provider_state: &ProviderState) -> ProviderStateDocument {
    ProviderStateDocument {
        name: provider_state.name.clone(),
        params: provider_state.params.clone(),
    }
}

fn build_request(request: &Request) -> RequestDocument {
    let (body, body_rules) = split_body(request.body.as_ref());
    let matching_rules = MatchingRules {
        path: matching_rules::extract_path(&request.path),
        header: request
            .headers
            .as_ref()
            .and_then(matching_rules::extract_headers),
        body: body_rules,
    };

    RequestDocument {
        method: request.method.clone(),
        path: request.path.without_matchers().to_string(),
        query: request.query.clone(),
        body,
        headers: request.headers.as_ref().map(plain_headers),
        matching_rules: matching_rules.into_option(),
    }
}

fn build_response(response: &Response) -> ResponseDocument {
    let (body, body_rules) = split_body(response.body.as_ref());
    let matching_rules = MatchingRules {
        path: None,
        header: response
            .headers
            .as_ref()
            .and_then(matching_rules::extract_headers),
        body: body_rules,
    };

    ResponseDocument {
        status: response.status,
        headers: response.headers.as_ref().map(plain_headers),
        body,
        matching_rules: matching_rules.into_option(),
    }
}

fn split_body(body: Option<&Template>) -> (Option<Value>, Option<RuleGroup>) {
    match body.map(matching_rules::extract_body) {
        Some((plain, rules)) => (Some(plain), rules),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{EachLike, Matcher, RegexMatch};
    use serde_json::json;

    fn zach_and_gabe(interaction: Interaction) -> Pact {
        let mut pact = Pact::new("Zach", "Gabe");
        pact.add_interaction(interaction);
        pact
    }

    fn built(pact: &Pact) -> Value {
        serde_json::to_value(build_pact_document(pact)).unwrap()
    }

    fn document_with(interaction: Value) -> Value {
        json!({
            "provider": {"name": "Gabe"},
            "consumer": {"name": "Zach"},
            "interactions": [interaction],
            "metadata": {"pactSpecification": {"version": "3.0.0"}}
        })
    }

    #[test]
    fn builds_pact_for_post() {
        let pact = zach_and_gabe(
            Interaction::new(
                "Zach messages gabe",
                Request::new("POST", "/gabe")
                    .with_body(json!({"message": "Hey gabe"}))
                    .with_header("Authorization", "Bearer ABCDE"),
                Response::new(200)
                    .with_body(json!({"message": "Ayee whatsup"}))
                    .with_header("Content-Type", "application/json"),
            )
            .given(ProviderState::new("Gabe is online")),
        );

        assert_eq!(
            built(&pact),
            document_with(json!({
                "description": "Zach messages gabe",
                "providerStates": [{"name": "Gabe is online"}],
                "request": {
                    "method": "POST",
                    "path": "/gabe",
                    "body": {"message": "Hey gabe"},
                    "headers": {"Authorization": "Bearer ABCDE"}
                },
                "response": {
                    "status": 200,
                    "body": {"message": "Ayee whatsup"},
                    "headers": {"Content-Type": "application/json"}
                }
            }))
        );
    }

    #[test]
    fn builds_pact_for_get_with_query() {
        let pact = zach_and_gabe(
            Interaction::new(
                "Zach checks friends online",
                Request::new("GET", "/friends").with_query_param("status", "online"),
                Response::new(200).with_body(json!({"number": 1})),
            )
            .given(ProviderState::new("Zach has one friend online")),
        );

        assert_eq!(
            built(&pact),
            document_with(json!({
                "description": "Zach checks friends online",
                "providerStates": [{"name": "Zach has one friend online"}],
                "request": {
                    "method": "GET",
                    "path": "/friends",
                    "query": {"status": ["online"]}
                },
                "response": {"status": 200, "body": {"number": 1}}
            }))
        );
    }

    #[test]
    fn provider_state_params_are_kept() {
        let mut params = serde_json::Map::new();
        params.insert("friends".into(), json!(3));
        let pact = zach_and_gabe(
            Interaction::new("check", Request::new("GET", "/"), Response::new(204))
                .given(ProviderState::new("Zach has friends").with_params(params)),
        );

        assert_eq!(
            built(&pact)["interactions"][0]["providerStates"],
            json!([{"name": "Zach has friends", "params": {"friends": 3}}])
        );
    }

    #[test]
    fn empty_provider_states_are_omitted() {
        let mut interaction =
            Interaction::new("check", Request::new("GET", "/"), Response::new(204));
        interaction.provider_states = Some(Vec::new());

        let document = built(&zach_and_gabe(interaction));

        assert!(document["interactions"][0].get("providerStates").is_none());
    }

    #[test]
    fn builds_pact_with_path_regex_matcher() {
        let pact = zach_and_gabe(Interaction::new(
            "Zach messages gabe",
            Request::new("POST", RegexMatch::new("/gabe", r"\/\w+").unwrap()),
            Response::new(200),
        ));

        assert_eq!(
            built(&pact),
            document_with(json!({
                "description": "Zach messages gabe",
                "request": {
                    "method": "POST",
                    "path": "/gabe",
                    "matchingRules": {
                        "path": {"matchers": [{"match": "regex", "regex": r"\/\w+"}]}
                    }
                },
                "response": {"status": 200}
            }))
        );
    }

    #[test]
    fn builds_pact_with_headers_regex_matcher() {
        let pact = zach_and_gabe(Interaction::new(
            "Zach messages gabe",
            Request::new("POST", "/gabe").with_header(
                "Authorization",
                RegexMatch::new("Bearer ABCDE", r"Bearer \S+").unwrap(),
            ),
            Response::new(200).with_header("Age", RegexMatch::new("12", r"\d+").unwrap()),
        ));

        assert_eq!(
            built(&pact),
            document_with(json!({
                "description": "Zach messages gabe",
                "request": {
                    "method": "POST",
                    "path": "/gabe",
                    "headers": {"Authorization": "Bearer ABCDE"},
                    "matchingRules": {
                        "header": {
                            "Authorization": {"matchers": [{"match": "regex", "regex": r"Bearer \S+"}]}
                        }
                    }
                },
                "response": {
                    "status": 200,
                    "headers": {"Age": "12"},
                    "matchingRules": {
                        "header": {"Age": {"matchers": [{"match": "regex", "regex": r"\d+"}]}}
                    }
                }
            }))
        );
    }

    #[test]
    fn builds_pact_with_nested_body_regex_on_both_sides() {
        let body = |value: &str, pattern: &str| {
            Template::object(vec![(
                "message",
                Template::object(vec![(
                    "contents",
                    Template::from(RegexMatch::new(value, pattern).unwrap()),
                )]),
            )])
        };
        let pact = zach_and_gabe(Interaction::new(
            "Zach messages gabe",
            Request::new("POST", "/gabe").with_body(body("yooo", "yo+")),
            Response::new(200).with_body(body("ayee whatsup", "aye+ whatsup")),
        ));

        assert_eq!(
            built(&pact),
            document_with(json!({
                "description": "Zach messages gabe",
                "request": {
                    "method": "POST",
                    "path": "/gabe",
                    "body": {"message": {"contents": "yooo"}},
                    "matchingRules": {
                        "body": {
                            "$.message.contents": {"matchers": [{"match": "regex", "regex": "yo+"}]}
                        }
                    }
                },
                "response": {
                    "status": 200,
                    "body": {"message": {"contents": "ayee whatsup"}},
                    "matchingRules": {
                        "body": {
                            "$.message.contents": {"matchers": [{"match": "regex", "regex": "aye+ whatsup"}]}
                        }
                    }
                }
            }))
        );
    }

    #[test]
    fn builds_pact_with_body_regex_in_list() {
        let pact = zach_and_gabe(Interaction::new(
            "Zach messages gabe",
            Request::new("POST", "/gabe").with_body(Template::object(vec![(
                "messages",
                Template::array(vec![Template::from(RegexMatch::new("yooo", "yo+").unwrap())]),
            )])),
            Response::new(200),
        ));

        let document = built(&pact);
        let request = &document["interactions"][0]["request"];

        assert_eq!(request["body"], json!({"messages": ["yooo"]}));
        assert_eq!(
            request["matchingRules"],
            json!({"body": {"$.messages[0]": {"matchers": [{"match": "regex", "regex": "yo+"}]}}})
        );
    }

    #[test]
    fn builds_response_with_array_like_matchers() {
        let item = Template::object(vec![
            ("dob", Template::from("2016-07-19")),
            ("id", Matcher::like(1600309982i64).unwrap().into()),
        ]);
        let pact = zach_and_gabe(Interaction::new(
            "array like",
            Request::new("GET", "/"),
            Response::new(200).with_body(Template::object(vec![
                ("array1", Template::from(EachLike::new(item, 1))),
                ("id", Matcher::like(7183997828i64).unwrap().into()),
            ])),
        ));

        let response = &built(&pact)["interactions"][0]["response"];

        assert_eq!(
            response["body"],
            json!({"array1": [{"dob": "2016-07-19", "id": 1600309982i64}], "id": 7183997828i64})
        );
        assert_eq!(
            response["matchingRules"],
            json!({"body": {
                "$.array1": {"matchers": [{"match": "type", "min": 1}]},
                "$.array1[*].id": {"matchers": [{"match": "type"}]},
                "$.id": {"matchers": [{"match": "type"}]}
            }})
        );
    }

    #[test]
    fn bodies_without_matchers_have_no_matching_rules() {
        let pact = zach_and_gabe(Interaction::new(
            "plain",
            Request::new("PUT", "/plain").with_body(json!({"a": [1, {"b": 2}]})),
            Response::new(200).with_body(json!({"ok": true})),
        ));

        let document = built(&pact);
        let interaction = &document["interactions"][0];

        assert!(interaction["request"].get("matchingRules").is_none());
        assert!(interaction["response"].get("matchingRules").is_none());
    }

    #[test]
    fn building_is_deterministic() {
        let pact = zach_and_gabe(Interaction::new(
            "Zach messages gabe",
            Request::new("POST", "/gabe").with_body(Template::object(vec![
                ("z", Template::from(RegexMatch::new("zz", "z+").unwrap())),
                ("a", Template::from(Matcher::like(1).unwrap())),
            ])),
            Response::new(200),
        ));

        let first = serde_json::to_string(&build_pact_document(&pact)).unwrap();
        let second = serde_json::to_string(&build_pact_document(&pact)).unwrap();

        assert_eq!(first, second);
        assert!(first.find("\"$.z\"").unwrap() < first.find("\"$.a\"").unwrap());
    }

    #[test]
    fn document_reads_back_into_the_same_value() {
        let pact = zach_and_gabe(Interaction::new(
            "Zach messages gabe",
            Request::new("POST", RegexMatch::new("/gabe", r"/\w+").unwrap())
                .with_body(Template::object(vec![(
                    "n",
                    Template::from(EachLike::new(Template::from(1i64), 2).with_max(3).unwrap()),
                )])),
            Response::new(201),
        ));
        let document = build_pact_document(&pact);

        let text = serde_json::to_string(&document).unwrap();
        let read_back: PactDocument = serde_json::from_str(&text).unwrap();

        assert_eq!(read_back, document);
    }
}
