//! Static city dataset
//!
//! The dataset is a JSON array of `{id, name, kana, pref}` objects. A copy is
//! compiled into the crate; a file on disk can replace it.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::models::City;
use crate::search::filter_cities;
use crate::{CitycastError, Result};

const BUNDLED_CITIES: &str = include_str!("../data/cities.json");

/// Read-only list of cities, loaded once
#[derive(Debug, Clone)]
pub struct CityCatalog {
    cities: Arc<[City]>,
}

impl CityCatalog {
    /// Dataset shipped with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CITIES)
    }

    /// Parse a dataset from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let cities: Vec<City> = serde_json::from_str(json)
            .map_err(|e| CitycastError::catalog(format!("Invalid city dataset: {e}")))?;
        debug!("Parsed {} cities", cities.len());
        Ok(Self {
            cities: cities.into(),
        })
    }

    /// Load a dataset file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!("Loaded {} cities from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Dataset file if given, otherwise the bundled one
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }

    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Shared handle to the list, for long-lived consumers
    #[must_use]
    pub fn shared(&self) -> Arc<[City]> {
        Arc::clone(&self.cities)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.id == id)
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<City> {
        filter_cities(&self.cities, query)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
