use crate::llm::{LlmError, MappingError, MappingService};
use crate::models::Credentials;
use crate::provider::{ProviderClient, ProviderError, ProviderRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// Provider double that records who called it and replies with a fixed body.
pub struct RecordingProvider {
    response: Value,
    seen: Mutex<Vec<(Credentials, ProviderRequest)>>,
}

impl RecordingProvider {
    pub fn returning(response: Value) -> Self {
        Self {
            response,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|(c, _)| c.key.clone()).collect()
    }

    pub fn secrets(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|(c, _)| c.secret.clone()).collect()
    }
}

#[async_trait]
impl ProviderClient for RecordingProvider {
    async fn call(&self, credentials: &Credentials, request: &ProviderRequest) -> Result<Value, ProviderError> {
        self.seen
            .lock()
            .unwrap()
            .push((credentials.clone(), request.clone()));
        Ok(self.response.clone())
    }
}

enum Reply {
    Echo,
    Fixed(String),
}

pub struct StubMapper {
    reply: Reply,
    last: Mutex<Option<(String, String)>>,
}

impl StubMapper {
    /// Returns the raw response text unchanged.
    pub fn echo() -> Self {
        Self {
            reply: Reply::Echo,
            last: Mutex::new(None),
        }
    }

    pub fn fixed(text: &str) -> Self {
        Self {
            reply: Reply::Fixed(text.to_string()),
            last: Mutex::new(None),
        }
    }

    pub fn last_call(&self) -> Option<(String, String)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl MappingService for StubMapper {
    async fn map(&self, api_response: &str, ui_requirements: &str) -> Result<String, MappingError> {
        *self.last.lock().unwrap() = Some((api_response.to_string(), ui_requirements.to_string()));
        Ok(match &self.reply {
            Reply::Echo => api_response.to_string(),
            Reply::Fixed(text) => text.clone(),
        })
    }
}

pub struct FailingMapper;

#[async_trait]
impl MappingService for FailingMapper {
    async fn map(&self, _api_response: &str, _ui_requirements: &str) -> Result<String, MappingError> {
        Err(MappingError::Llm(LlmError::EmptyCompletion))
    }
}
