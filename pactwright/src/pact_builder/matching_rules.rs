use crate::matchers::{Matcher, Template, TextTemplate};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

lazy_static! {
    static ref PLAIN_FIELD_NAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_\-]+$").unwrap();
}

pub const ROOT_PATH: &str = "$";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "lowercase")]
pub enum MatchingRule {
    Regex {
        regex: String,
    },
    Type {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleList {
    pub matchers: Vec<MatchingRule>,
}

impl RuleList {
    fn single(rule: MatchingRule) -> Self {
        Self {
            matchers: vec![rule],
        }
    }
}

/// Matching rules keyed by path expression or header name, in discovery order.
pub type RuleGroup = IndexMap<String, RuleList>;

/// Resolves every matcher in `body` and collects the rule each one contributes.
/// The group is `None` when the body holds no matcher at all.
pub fn extract_body(body: &Template) -> (Value, Option<RuleGroup>) {
    let mut rules = RuleGroup::new();
    let plain = walk(body, ROOT_PATH, &mut rules);

    (plain, non_empty(rules))
}

fn walk(template: &Template, path: &str, rules: &mut RuleGroup) -> Value {
    match template {
        Template::Value(value) => value.clone(),
        Template::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(field, value)| {
                    let plain = walk(value, &field_path(path, field), rules);
                    (field.clone(), plain)
                })
                .collect(),
        ),
        Template::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| walk(item, &format!("{}[{}]", path, index), rules))
                .collect(),
        ),
        Template::Matcher(matcher) => walk_matcher(matcher, path, rules),
    }
}

fn walk_matcher(matcher: &Matcher, path: &str, rules: &mut RuleGroup) -> Value {
    match matcher {
        Matcher::Exact(template) => walk(template, path, rules),
        Matcher::Regex(regex) => {
            rules.insert(
                path.to_string(),
                RuleList::single(MatchingRule::Regex {
                    regex: regex.pattern().to_string(),
                }),
            );
            Value::String(regex.value().to_string())
        }
        Matcher::Like(value) => {
            rules.insert(
                path.to_string(),
                RuleList::single(MatchingRule::Type {
                    min: None,
                    max: None,
                }),
            );
            value.clone()
        }
        Matcher::EachLike(each_like) => {
            rules.insert(
                path.to_string(),
                RuleList::single(MatchingRule::Type {
                    min: Some(each_like.min()),
                    max: each_like.max(),
                }),
            );
            let element = walk(each_like.example(), &format!("{}[*]", path), rules);
            Value::Array(vec![element; each_like.repetitions()])
        }
    }
}

fn field_path(parent: &str, field: &str) -> String {
    if PLAIN_FIELD_NAME_REGEX.is_match(field) {
        format!("{}.{}", parent, field)
    } else {
        format!("{}['{}']", parent, field.replace('\'', "\\'"))
    }
}

/// Headers are flat: a rule is keyed by the header name itself.
pub fn extract_headers(headers: &IndexMap<String, TextTemplate>) -> Option<RuleGroup> {
    let rules = headers
        .iter()
        .filter_map(|(name, value)| match value {
            TextTemplate::Regex(regex) => Some((
                name.clone(),
                RuleList::single(MatchingRule::Regex {
                    regex: regex.pattern().to_string(),
                }),
            )),
            TextTemplate::Literal(_) => None,
        })
        .collect();

    non_empty(rules)
}

pub fn extract_path(path: &TextTemplate) -> Option<RuleList> {
    match path {
        TextTemplate::Regex(regex) => Some(RuleList::single(MatchingRule::Regex {
            regex: regex.pattern().to_string(),
        })),
        TextTemplate::Literal(_) => None,
    }
}

fn non_empty(rules: RuleGroup) -> Option<RuleGroup> {
    if rules.is_empty() {
        None
    } else {
        Some(rules)
    }
}
