use super::{LlmClient, LlmError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

const SYSTEM_PROMPT: &str = "You are a data mapping expert. You always answer with a single JSON object \
     of the form {\"mappedData\": \"<JSON text>\"} where the value is the mapped data serialized as a string.";

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("valid fence pattern"));

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("Mapping reply is not valid JSON: {0}")]
    MalformedReply(String),

    #[error("Mapping reply has no `mappedData` field")]
    MissingField,

    #[error("Mapped data is not valid JSON: {0}")]
    InvalidMappedJson(#[source] serde_json::Error),
}

/// Reshapes a raw provider response according to a prose description.
#[async_trait]
pub trait MappingService: Send + Sync {
    async fn map(&self, api_response: &str, ui_requirements: &str) -> Result<String, MappingError>;
}

pub struct LlmMapper {
    client: LlmClient,
}

impl LlmMapper {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MappingService for LlmMapper {
    async fn map(&self, api_response: &str, ui_requirements: &str) -> Result<String, MappingError> {
        let prompt = build_prompt(api_response, ui_requirements);
        let reply = self.client.complete_json(SYSTEM_PROMPT, &prompt).await?;
        extract_mapped_data(&reply)
    }
}

fn build_prompt(api_response: &str, ui_requirements: &str) -> String {
    format!(
        "Your task is to transform the raw API response from Amadeus to a format suitable for the UI, \
         based on the UI requirements.\n\n\
         UI Requirements: {}\n\n\
         Raw API Response: {}\n\n\
         Please provide the mapped data in JSON format.",
        ui_requirements, api_response
    )
}

/// Reads `mappedData` out of the model reply. Models sometimes wrap the
/// object in a Markdown fence or return the field as an object instead of
/// a string; both are accepted.
fn extract_mapped_data(reply: &str) -> Result<String, MappingError> {
    let body = CODE_FENCE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map_or(reply, |m| m.as_str());

    let envelope: Value =
        serde_json::from_str(body).map_err(|e| MappingError::MalformedReply(e.to_string()))?;

    match envelope.get("mappedData") {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Null) | None => Err(MappingError::MissingField),
        Some(other) => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_both_inputs() {
        let prompt = build_prompt("{\"data\":[]}", "Display the check-in link.");
        assert!(prompt.contains("UI Requirements: Display the check-in link."));
        assert!(prompt.contains("Raw API Response: {\"data\":[]}"));
    }

    #[test]
    fn string_field_is_returned_verbatim() {
        let reply = r#"{"mappedData": "{\"hotels\":[]}"}"#;
        assert_eq!(extract_mapped_data(reply).unwrap(), r#"{"hotels":[]}"#);
    }

    #[test]
    fn object_field_is_reserialized() {
        let reply = r#"{"mappedData": {"routes": [{"id": 0}]}}"#;
        assert_eq!(extract_mapped_data(reply).unwrap(), r#"{"routes":[{"id":0}]}"#);
    }

    #[test]
    fn fenced_replies_are_unwrapped() {
        let reply = "```json\n{\"mappedData\": \"[]\"}\n```";
        assert_eq!(extract_mapped_data(reply).unwrap(), "[]");
    }

    #[test]
    fn prose_and_missing_fields_are_errors() {
        assert!(matches!(
            extract_mapped_data("Here is your data!"),
            Err(MappingError::MalformedReply(_))
        ));
        assert!(matches!(
            extract_mapped_data(r#"{"data": 1}"#),
            Err(MappingError::MissingField)
        ));
    }
}
