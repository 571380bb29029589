mod error;
mod pipeline;

pub use error::{DispatchError, MISSING_CREDENTIALS, UNKNOWN_ERROR};
pub use pipeline::{DispatchPipeline, ExecuteOutcome, MissingCredentials};
