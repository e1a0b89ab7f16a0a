//! Registry mapping logical operation names to concrete endpoints.

use crate::error::{Error, Result};
use http::Method;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

const BUNDLED: &str = include_str!("../data/user.json");

/// Where and how to send one logical operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Endpoint {
    pub url: String,
    #[serde(deserialize_with = "deserialize_method")]
    pub method: Method,
    /// Free-form note about what the endpoint returns.
    #[serde(default)]
    pub comment: Option<String>,
}

fn deserialize_method<'de, D>(deserializer: D) -> Result<Method, D::Error>
where
    D: Deserializer<'de>,
{
    let method = String::deserialize(deserializer)?;
    Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(serde::de::Error::custom)
}

/// Looks up the endpoint behind a logical operation name such as `info.relation`.
pub trait ApiCatalog: Send + Sync {
    /// Fails with [`Error::UnknownOperation`] if `name` is not registered.
    fn lookup(&self, name: &str) -> Result<&Endpoint>;
}

/// An [`ApiCatalog`] backed by an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    endpoints: HashMap<String, Endpoint>,
}

impl StaticCatalog {
    /// The catalog of user endpoints shipped with this crate.
    pub fn builtin() -> Self {
        Self::from_json(BUNDLED).expect("bundled catalog is valid")
    }

    /// Parses a document of the form `{"group": {"name": {"url": .., "method": ..}}}`.
    ///
    /// Entries are registered as `group.name`.
    pub fn from_json(document: &str) -> Result<Self> {
        let groups: HashMap<String, HashMap<String, Endpoint>> = serde_json::from_str(document)?;
        let endpoints = groups
            .into_iter()
            .flat_map(|(group, entries)| {
                entries
                    .into_iter()
                    .map(move |(name, endpoint)| (format!("{group}.{name}"), endpoint))
            })
            .collect();
        Ok(Self { endpoints })
    }

    /// Registers (or replaces) a single endpoint.
    pub fn insert(&mut self, name: impl Into<String>, endpoint: Endpoint) {
        self.endpoints.insert(name.into(), endpoint);
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl ApiCatalog for StaticCatalog {
    fn lookup(&self, name: &str) -> Result<&Endpoint> {
        self.endpoints
            .get(name)
            .ok_or_else(|| Error::UnknownOperation(name.to_string()))
    }
}
