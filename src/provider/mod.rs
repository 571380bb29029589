mod amadeus_client;
mod routes;

pub use amadeus_client::AmadeusClient;
pub use routes::{Arg, ProviderRequest, Resolution, Route, RouteEntry, RoutingTable};

use crate::models::Credentials;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider authentication failed with status {status}")]
    Unauthorized {
        status: u16,
        description: Option<String>,
    },

    #[error("Provider rejected the request with status {status}")]
    Rejected {
        status: u16,
        description: Option<String>,
    },

    #[error("Missing value for path parameter `{0}`")]
    MissingPathParam(String),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),
}

impl ProviderError {
    /// The provider's own explanation, when its error body carried one.
    pub fn description(&self) -> Option<&str> {
        match self {
            ProviderError::Unauthorized { description, .. } | ProviderError::Rejected { description, .. } => {
                description.as_deref().filter(|d| !d.trim().is_empty())
            }
            _ => None,
        }
    }
}

/// Live access to the travel-data provider.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn call(&self, credentials: &Credentials, request: &ProviderRequest) -> Result<Value, ProviderError>;
}
