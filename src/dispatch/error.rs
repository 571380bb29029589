use crate::llm::MappingError;
use crate::provider::ProviderError;
use thiserror::Error;

pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

pub const MISSING_CREDENTIALS: &str = "Amadeus API credentials are not configured. \
     Please add AMADEUS_API_KEY and AMADEUS_API_SECRET to your .env file.";

/// Every way a dispatch can fail. Flattened to a message only at the
/// outer boundary, see [`DispatchError::user_message`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("API not found")]
    NotFound { api_id: String },

    #[error("{}", MISSING_CREDENTIALS)]
    Configuration,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl DispatchError {
    /// Message shown to the user: the provider's structured description if
    /// there is one, then the error's own text, then a generic fallback.
    pub fn user_message(&self) -> String {
        if let DispatchError::Provider(err) = self {
            if let Some(description) = err.description() {
                return description.to_string();
            }
        }

        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}
