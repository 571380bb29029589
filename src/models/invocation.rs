use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

const PLACEHOLDER_KEY: &str = "YOUR_API_KEY";
const PLACEHOLDER_SECRET: &str = "YOUR_API_SECRET";

/// A primitive form value as submitted by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, ParamValue::Text(text) if text.trim().is_empty())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(n) => Some(*n as f64),
            ParamValue::Float(n) => Some(*n),
            ParamValue::Text(text) => text.trim().parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
            ParamValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

pub type Params = BTreeMap<String, ParamValue>;

/// Provider account key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Builds a key pair only when both halves are real values.
    pub fn usable(key: Option<&str>, secret: Option<&str>) -> Option<Self> {
        let credentials = Self::new(key?.trim(), secret?.trim());
        credentials.is_usable().then_some(credentials)
    }

    /// Trimmed copy, or `None` for empty and placeholder values.
    pub fn normalized(&self) -> Option<Self> {
        Self::usable(Some(&self.key), Some(&self.secret))
    }

    pub fn is_usable(&self) -> bool {
        let key = self.key.trim();
        let secret = self.secret.trim();
        !key.is_empty() && !secret.is_empty() && key != PLACEHOLDER_KEY && secret != PLACEHOLDER_SECRET
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn default_use_mock() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    pub api_id: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default = "default_use_mock")]
    pub use_mock: bool,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

impl InvocationRequest {
    pub fn mock(api_id: impl Into<String>, params: Params) -> Self {
        Self {
            api_id: api_id.into(),
            params,
            use_mock: true,
            credentials: None,
        }
    }

    pub fn live(api_id: impl Into<String>, params: Params, credentials: Option<Credentials>) -> Self {
        Self {
            api_id: api_id.into(),
            params,
            use_mock: false,
            credentials,
        }
    }
}

/// Successful dispatch: the provider payload plus its display projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedResult {
    pub raw: Value,
    pub mapped: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_credentials_are_not_usable() {
        assert!(Credentials::usable(Some("YOUR_API_KEY"), Some("real")).is_none());
        assert!(Credentials::usable(Some("real"), Some("YOUR_API_SECRET")).is_none());
        assert!(Credentials::usable(Some("  "), Some("secret")).is_none());
        assert!(Credentials::usable(None, Some("secret")).is_none());
        assert!(Credentials::usable(Some("key"), Some("secret")).is_some());
    }

    #[test]
    fn normalizing_trims_both_halves() {
        assert_eq!(
            Credentials::new(" abc ", "\tsecret\n").normalized(),
            Some(Credentials::new("abc", "secret"))
        );
        assert_eq!(Credentials::new(" YOUR_API_KEY ", "secret").normalized(), None);
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", Credentials::new("key", "hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("key"));
    }

    #[test]
    fn request_body_defaults_to_mock_mode() {
        let request: InvocationRequest =
            serde_json::from_str(r#"{"apiId":"city-search","params":{"keyword":"Paris","adults":2}}"#).unwrap();
        assert!(request.use_mock);
        assert_eq!(request.params["keyword"], ParamValue::from("Paris"));
        assert_eq!(request.params["adults"], ParamValue::Integer(2));
    }

    #[test]
    fn numbers_parse_from_text() {
        assert_eq!(ParamValue::from("3").as_number(), Some(3.0));
        assert_eq!(ParamValue::from("three").as_number(), None);
        assert_eq!(ParamValue::Bool(true).as_number(), None);
    }
}
