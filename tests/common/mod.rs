#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use travel_api_explorer::llm::{MappingError, MappingService};
use travel_api_explorer::provider::{ProviderClient, ProviderError, ProviderRequest, RoutingTable};
use travel_api_explorer::{Catalog, Credentials, DispatchPipeline};

/// Deterministic stand-in for the LLM: applies a plain function to the raw
/// response.
pub struct TransformMapper<F>(pub F);

#[async_trait]
impl<F> MappingService for TransformMapper<F>
where
    F: Fn(&Value) -> Value + Send + Sync,
{
    async fn map(&self, api_response: &str, _ui_requirements: &str) -> Result<String, MappingError> {
        let raw: Value = serde_json::from_str(api_response).map_err(MappingError::InvalidMappedJson)?;
        Ok((self.0)(&raw).to_string())
    }
}

pub fn identity_mapper() -> TransformMapper<fn(&Value) -> Value> {
    TransformMapper(|raw: &Value| raw.clone())
}

/// Projects hotel offers into `{ hotels: [{ id, name }] }`.
pub fn hotel_mapper() -> TransformMapper<fn(&Value) -> Value> {
    TransformMapper(|raw: &Value| {
        let hotels: Vec<Value> = raw["data"]
            .as_array()
            .map(|offers| {
                offers
                    .iter()
                    .map(|offer| json!({ "id": offer["hotel"]["hotelId"], "name": offer["hotel"]["name"] }))
                    .collect()
            })
            .unwrap_or_default();
        json!({ "hotels": hotels })
    })
}

pub enum ProviderReply {
    Body(Value),
    Reject { status: u16, description: Option<String> },
}

pub struct FakeProvider {
    reply: ProviderReply,
    calls: AtomicUsize,
    last: std::sync::Mutex<Option<ProviderRequest>>,
}

impl FakeProvider {
    pub fn new(reply: ProviderReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last: std::sync::Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderClient for FakeProvider {
    async fn call(&self, _credentials: &Credentials, request: &ProviderRequest) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());
        match &self.reply {
            ProviderReply::Body(body) => Ok(body.clone()),
            ProviderReply::Reject { status, description } => Err(ProviderError::Rejected {
                status: *status,
                description: description.clone(),
            }),
        }
    }
}

pub fn pipeline_with(
    provider: Arc<FakeProvider>,
    mapper: impl MappingService + 'static,
    credentials: Option<Credentials>,
) -> DispatchPipeline {
    DispatchPipeline::new(
        Arc::new(Catalog::builtin().expect("builtin catalog")),
        Arc::new(RoutingTable::amadeus()),
        provider,
        Arc::new(mapper),
    )
    .with_default_credentials(credentials)
}

pub fn valid_credentials() -> Credentials {
    Credentials::new("live-key", "live-secret")
}
