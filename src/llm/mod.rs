mod client;
mod mapper;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, LlmClient, LlmError, LlmSettings};
pub use mapper::{LlmMapper, MappingError, MappingService};
