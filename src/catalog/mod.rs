mod params;
mod registry;

pub use params::{ParamViolation, ValidationError};
pub use registry::{Catalog, CatalogError};
