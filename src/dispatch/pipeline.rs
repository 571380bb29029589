use super::DispatchError;
use crate::catalog::Catalog;
use crate::llm::{MappingError, MappingService};
use crate::models::{ApiDefinition, Credentials, InvocationRequest, MappedResult};
use crate::provider::{ProviderClient, Resolution, RoutingTable};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What to do when live data is requested but no usable credentials exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingCredentials {
    /// Fail with a configuration error; no network call is made.
    #[default]
    Error,
    /// Serve the mock payload instead.
    Mock,
}

impl FromStr for MissingCredentials {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(MissingCredentials::Error),
            "mock" => Ok(MissingCredentials::Mock),
            other => Err(format!("expected `error` or `mock`, got `{}`", other)),
        }
    }
}

/// The `{ raw, mapped } | { error }` shape handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecuteOutcome {
    Success(MappedResult),
    Failure { error: String },
}

impl ExecuteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecuteOutcome::Success(_))
    }
}

impl From<Result<MappedResult, DispatchError>> for ExecuteOutcome {
    fn from(result: Result<MappedResult, DispatchError>) -> Self {
        match result {
            Ok(mapped) => ExecuteOutcome::Success(mapped),
            Err(err) => ExecuteOutcome::Failure {
                error: err.user_message(),
            },
        }
    }
}

/// Resolves an API id to raw data (live or mock) and maps it for display.
/// Holds no per-request state; one instance serves any number of
/// concurrent dispatches.
#[derive(Clone)]
pub struct DispatchPipeline {
    catalog: Arc<Catalog>,
    routes: Arc<RoutingTable>,
    provider: Arc<dyn ProviderClient>,
    mapper: Arc<dyn MappingService>,
    default_credentials: Option<Credentials>,
    missing_credentials: MissingCredentials,
}

impl DispatchPipeline {
    pub fn new(
        catalog: Arc<Catalog>,
        routes: Arc<RoutingTable>,
        provider: Arc<dyn ProviderClient>,
        mapper: Arc<dyn MappingService>,
    ) -> Self {
        Self {
            catalog,
            routes,
            provider,
            mapper,
            default_credentials: None,
            missing_credentials: MissingCredentials::default(),
        }
    }

    /// Credentials used when a request brings none of its own.
    pub fn with_default_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.default_credentials = credentials.as_ref().and_then(Credentials::normalized);
        self
    }

    pub fn with_missing_credentials(mut self, policy: MissingCredentials) -> Self {
        self.missing_credentials = policy;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Runs one request, flattening any failure into a message.
    pub async fn execute(&self, request: &InvocationRequest) -> ExecuteOutcome {
        self.dispatch(request).await.into()
    }

    pub async fn dispatch(&self, request: &InvocationRequest) -> Result<MappedResult, DispatchError> {
        let result = self.run(request).await;
        if let Err(err) = &result {
            error!(api_id = %request.api_id, error = %err, "dispatch failed");
        }
        result
    }

    async fn run(&self, request: &InvocationRequest) -> Result<MappedResult, DispatchError> {
        let api = self
            .catalog
            .lookup(&request.api_id)
            .ok_or_else(|| DispatchError::NotFound {
                api_id: request.api_id.clone(),
            })?;

        info!(api_id = %api.id, use_mock = request.use_mock, "dispatching");

        let raw = self.raw_response(api, request).await?;

        let api_response = serde_json::to_string_pretty(&raw).unwrap_or_else(|_| raw.to_string());
        let mapped = self.mapper.map(&api_response, &api.mapping_spec).await?;
        serde_json::from_str::<Value>(&mapped).map_err(MappingError::InvalidMappedJson)?;

        Ok(MappedResult { raw, mapped })
    }

    async fn raw_response(&self, api: &ApiDefinition, request: &InvocationRequest) -> Result<Value, DispatchError> {
        if request.use_mock {
            return Ok(api.mock_response.clone());
        }

        let Some(credentials) = self.credentials_for(request) else {
            return match self.missing_credentials {
                MissingCredentials::Error => Err(DispatchError::Configuration),
                MissingCredentials::Mock => {
                    warn!(api_id = %api.id, "no provider credentials, serving mock data");
                    Ok(api.mock_response.clone())
                }
            };
        };

        match self.routes.resolve(&api.id) {
            Resolution::Live(route) => {
                let provider_request = route.project(&request.params)?;
                Ok(self.provider.call(&credentials, &provider_request).await?)
            }
            Resolution::Unsupported(reason) => {
                warn!(api_id = %api.id, reason, "no live mapping, using mock data");
                Ok(api.mock_response.clone())
            }
        }
    }

    fn credentials_for(&self, request: &InvocationRequest) -> Option<Credentials> {
        request
            .credentials
            .as_ref()
            .and_then(Credentials::normalized)
            .or_else(|| self.default_credentials.clone())
    }
}
