mod api_definition;
mod invocation;

pub use api_definition::{ApiDefinition, ApiSummary, ParamKind, ParamSpec};
pub use invocation::{Credentials, InvocationRequest, MappedResult, ParamValue, Params};
