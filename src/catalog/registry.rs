use crate::models::ApiDefinition;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate API id `{0}`")]
    DuplicateApi(String),

    #[error("API `{api}` declares parameter `{param}` more than once")]
    DuplicateParam { api: String, param: String },
}

/// Read-only table of API definitions keyed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    apis: Vec<ApiDefinition>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let apis: Vec<ApiDefinition> = serde_json::from_str(text)?;
        Self::from_definitions(apis)
    }

    pub fn from_definitions(apis: Vec<ApiDefinition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(apis.len());

        for (position, api) in apis.iter().enumerate() {
            if index.insert(api.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateApi(api.id.clone()));
            }

            let mut seen = HashSet::new();
            for param in &api.params {
                if !seen.insert(param.name.as_str()) {
                    return Err(CatalogError::DuplicateParam {
                        api: api.id.clone(),
                        param: param.name.clone(),
                    });
                }
            }
        }

        Ok(Self { apis, index })
    }

    pub fn lookup(&self, api_id: &str) -> Option<&ApiDefinition> {
        self.index.get(api_id).map(|&position| &self.apis[position])
    }

    /// Definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ApiDefinition> {
        self.apis.iter()
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.apis)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_catalog_loads_every_definition() {
        let catalog = Catalog::builtin().expect("builtin catalog parses");
        assert_eq!(catalog.len(), 39);
        assert!(catalog.lookup("hotel-search").is_some());
        assert!(catalog.lookup("nonexistent-id").is_none());
    }

    #[test]
    fn builtin_mocks_match_known_payloads() {
        let catalog = Catalog::builtin().unwrap();

        let airline = catalog.lookup("airline-code-lookup").unwrap();
        assert_eq!(
            airline.mock_response,
            json!({ "data": [{ "iataCode": "BA", "icaoCode": "BAW", "businessName": "BRITISH AIRWAYS" }] })
        );

        let hotels = catalog.lookup("hotel-search").unwrap();
        let names: Vec<&str> = hotels.mock_response["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|offer| offer["hotel"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Le Grand Hotel", "Chic Boutique Hotel", "Eiffel View Inn"]);

        let flights = catalog.lookup("flight-offers-search").unwrap();
        assert_eq!(flights.mock_response["data"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = json!([
            { "id": "a", "name": "A", "description": "", "mockResponse": {}, "mappingSpec": "" },
            { "id": "a", "name": "A again", "description": "", "mockResponse": {}, "mappingSpec": "" }
        ])
        .to_string();

        assert!(matches!(Catalog::from_json(&text), Err(CatalogError::DuplicateApi(id)) if id == "a"));
    }

    #[test]
    fn duplicate_param_names_are_rejected() {
        let text = json!([{
            "id": "a", "name": "A", "description": "", "mockResponse": {}, "mappingSpec": "",
            "params": [
                { "name": "x", "label": "X", "kind": "text", "required": true },
                { "name": "x", "label": "X2", "kind": "date", "required": false }
            ]
        }])
        .to_string();

        assert!(matches!(
            Catalog::from_json(&text),
            Err(CatalogError::DuplicateParam { api, param }) if api == "a" && param == "x"
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::from_path("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
