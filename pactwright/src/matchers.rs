use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// Raised when a matcher is built from an example that doesn't satisfy its own rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidMatcherConstruction {
    #[error("\"{value}\" doesn't match the pattern \"{pattern}\"")]
    PatternMismatch { value: String, pattern: String },
    #[error("\"{pattern}\" is not a valid regular expression: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("A type matcher only accepts scalar examples, got {0}")]
    NonScalarExample(Value),
    #[error("Invalid array bounds: min {min}, max {max}")]
    InvalidBounds { min: usize, max: usize },
}

/// An example string that also carries the pattern actual values must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct RegexMatch {
    value: String,
    pattern: String,
}

impl RegexMatch {
    /// Create a regex matcher. The pattern has to match `value` starting from its first
    /// character, otherwise the example would contradict the rule it documents.
    pub fn new<S1: Into<String>, S2: Into<String>>(
        value: S1,
        pattern: S2,
    ) -> Result<Self, InvalidMatcherConstruction> {
        let value = value.into();
        let pattern = pattern.into();

        let invalid_pattern = |e: regex::Error| InvalidMatcherConstruction::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        };
        // the wrapped form can balance an unbalanced pattern, so check it alone first
        regex::Regex::new(&pattern).map_err(invalid_pattern)?;
        let anchored = regex::Regex::new(&format!("^(?:{})", pattern)).map_err(invalid_pattern)?;

        if !anchored.is_match(&value) {
            return Err(InvalidMatcherConstruction::PatternMismatch { value, pattern });
        }

        Ok(Self { value, pattern })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A repeated array: every element has to look like `example`.
#[derive(Debug, Clone, PartialEq)]
pub struct EachLike {
    example: Template,
    min: usize,
    max: Option<usize>,
}

impl EachLike {
    pub fn new<T: Into<Template>>(example: T, min: usize) -> Self {
        Self {
            example: example.into(),
            min,
            max: None,
        }
    }

    pub fn with_max(mut self, max: usize) -> Result<Self, InvalidMatcherConstruction> {
        if max == 0 || max < self.min {
            return Err(InvalidMatcherConstruction::InvalidBounds { min: self.min, max });
        }

        self.max = Some(max);
        Ok(self)
    }

    pub fn example(&self) -> &Template {
        &self.example
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Number of example copies the plain array gets.
    pub fn repetitions(&self) -> usize {
        self.min.max(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    Exact(Template),
    Regex(RegexMatch),
    Like(Value),
    EachLike(EachLike),
}

impl Matcher {
    pub fn exact<T: Into<Template>>(value: T) -> Self {
        Matcher::Exact(value.into())
    }

    pub fn regex<S1: Into<String>, S2: Into<String>>(
        value: S1,
        pattern: S2,
    ) -> Result<Self, InvalidMatcherConstruction> {
        RegexMatch::new(value, pattern).map(Matcher::Regex)
    }

    pub fn like<V: Into<Value>>(value: V) -> Result<Self, InvalidMatcherConstruction> {
        let value = value.into();
        match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(Matcher::Like(value)),
            other => Err(InvalidMatcherConstruction::NonScalarExample(other)),
        }
    }

    pub fn each_like<T: Into<Template>>(example: T, min: usize) -> Self {
        Matcher::EachLike(EachLike::new(example, min))
    }

    /// The example value with every nested matcher resolved.
    pub fn without_matchers(&self) -> Value {
        match self {
            Matcher::Exact(template) => template.without_matchers(),
            Matcher::Regex(regex) => Value::String(regex.value.clone()),
            Matcher::Like(value) => value.clone(),
            Matcher::EachLike(each_like) => {
                let element = each_like.example.without_matchers();
                Value::Array(vec![element; each_like.repetitions()])
            }
        }
    }
}

/// An expected JSON body where any position may hold a matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    Value(Value),
    Object(IndexMap<String, Template>),
    Array(Vec<Template>),
    Matcher(Box<Matcher>),
}

impl Template {
    pub fn object<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Template>,
        I: IntoIterator<Item = (K, V)>,
    {
        Template::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn array<V: Into<Template>, I: IntoIterator<Item = V>>(items: I) -> Self {
        Template::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn without_matchers(&self) -> Value {
        match self {
            Template::Value(value) => value.clone(),
            Template::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), value.without_matchers()))
                    .collect(),
            ),
            Template::Array(items) => {
                Value::Array(items.iter().map(Template::without_matchers).collect())
            }
            Template::Matcher(matcher) => matcher.without_matchers(),
        }
    }
}

impl From<Value> for Template {
    fn from(value: Value) -> Self {
        Template::Value(value)
    }
}

impl From<Matcher> for Template {
    fn from(matcher: Matcher) -> Self {
        Template::Matcher(Box::new(matcher))
    }
}

impl From<RegexMatch> for Template {
    fn from(regex: RegexMatch) -> Self {
        Matcher::Regex(regex).into()
    }
}

impl From<EachLike> for Template {
    fn from(each_like: EachLike) -> Self {
        Matcher::EachLike(each_like).into()
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Template::Value(value.into())
    }
}

impl From<String> for Template {
    fn from(value: String) -> Self {
        Template::Value(value.into())
    }
}

impl From<i64> for Template {
    fn from(value: i64) -> Self {
        Template::Value(value.into())
    }
}

impl From<f64> for Template {
    fn from(value: f64) -> Self {
        Template::Value(value.into())
    }
}

impl From<bool> for Template {
    fn from(value: bool) -> Self {
        Template::Value(value.into())
    }
}

impl From<Vec<Template>> for Template {
    fn from(items: Vec<Template>) -> Self {
        Template::Array(items)
    }
}

/// A string that is either taken literally or matched by a regex, used for paths and headers.
#[derive(Debug, Clone, PartialEq)]
pub enum TextTemplate {
    Literal(String),
    Regex(RegexMatch),
}

impl TextTemplate {
    pub fn without_matchers(&self) -> &str {
        match self {
            TextTemplate::Literal(text) => text,
            TextTemplate::Regex(regex) => regex.value(),
        }
    }
}

impl From<&str> for TextTemplate {
    fn from(text: &str) -> Self {
        TextTemplate::Literal(text.into())
    }
}

impl From<String> for TextTemplate {
    fn from(text: String) -> Self {
        TextTemplate::Literal(text)
    }
}

impl From<RegexMatch> for TextTemplate {
    fn from(regex: RegexMatch) -> Self {
        TextTemplate::Regex(regex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn regex_matcher_rejects_non_matching_example() {
        assert_eq!(
            RegexMatch::new("nope", "yo+"),
            Err(InvalidMatcherConstruction::PatternMismatch {
                value: "nope".into(),
                pattern: "yo+".into()
            })
        );
    }

    #[test]
    fn regex_matcher_is_anchored_at_the_start_only() {
        assert!(RegexMatch::new("yooo there", "yo+").is_ok());
        assert!(RegexMatch::new("hey yooo", "yo+").is_err());
    }

    #[test]
    fn regex_matcher_rejects_invalid_pattern() {
        match RegexMatch::new("a", "(") {
            Err(InvalidMatcherConstruction::InvalidPattern { pattern, .. }) => {
                assert_eq!(pattern, "(")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        match RegexMatch::new("xb", "a)|(b") {
            Err(InvalidMatcherConstruction::InvalidPattern { pattern, .. }) => {
                assert_eq!(pattern, "a)|(b")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn like_only_accepts_scalars() {
        assert!(Matcher::like(12).is_ok());
        assert!(Matcher::like("text").is_ok());
        assert!(Matcher::like(true).is_ok());
        assert_eq!(
            Matcher::like(json!({"a": 1})),
            Err(InvalidMatcherConstruction::NonScalarExample(json!({"a": 1})))
        );
        assert!(Matcher::like(Value::Null).is_err());
    }

    #[test]
    fn each_like_bounds_are_validated() {
        assert!(EachLike::new("x", 2).with_max(1).is_err());
        assert!(EachLike::new("x", 0).with_max(0).is_err());
        assert_eq!(EachLike::new("x", 1).with_max(5).unwrap().max(), Some(5));
    }

    #[test]
    fn nested_matchers_resolve_to_plain_json() {
        let template = Template::object(vec![
            ("id", Template::from(Matcher::like(42).unwrap())),
            (
                "tags",
                EachLike::new(
                    Template::object(vec![(
                        "name",
                        Template::from(RegexMatch::new("rust", "[a-z]+").unwrap()),
                    )]),
                    2,
                )
                .into(),
            ),
            (
                "raw",
                Matcher::exact(Template::array(vec![Template::from(1i64), 2i64.into()])).into(),
            ),
        ]);

        assert_eq!(
            template.without_matchers(),
            json!({
                "id": 42,
                "tags": [{"name": "rust"}, {"name": "rust"}],
                "raw": [1, 2]
            })
        );
    }

    #[test]
    fn each_like_with_zero_min_still_shows_one_example() {
        let matcher = Matcher::each_like("a", 0);
        assert_eq!(matcher.without_matchers(), json!(["a"]));
    }
}
