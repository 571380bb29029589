//! Explorer for a catalog of travel-data APIs: dispatches a request to the
//! live provider or its mock payload, then reshapes the response for
//! display through a generative-text mapping step.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod llm;
pub mod logging;
pub mod models;
pub mod provider;
pub mod web;

#[cfg(test)]
mod test_support;

pub use catalog::Catalog;
pub use crate::config::AppConfig;
pub use dispatch::{DispatchError, DispatchPipeline, ExecuteOutcome, MissingCredentials};
pub use models::{ApiDefinition, Credentials, InvocationRequest, MappedResult, ParamValue, Params};

use anyhow::{Context, Result};
use std::sync::Arc;

/// Wires catalog, routing table, provider client and mapper from config.
pub fn build_pipeline(config: &AppConfig) -> Result<DispatchPipeline> {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };

    let provider = provider::AmadeusClient::new(&config.amadeus.base_url, config.http_timeout)
        .context("failed to build provider client")?;
    let llm_client = llm::LlmClient::new(&config.llm).context("failed to build LLM client")?;

    Ok(DispatchPipeline::new(
        Arc::new(catalog),
        Arc::new(provider::RoutingTable::amadeus()),
        Arc::new(provider),
        Arc::new(llm::LlmMapper::new(llm_client)),
    )
    .with_default_credentials(config.provider_credentials())
    .with_missing_credentials(config.missing_credentials))
}
