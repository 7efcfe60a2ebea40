//! Keyed material records supplied by the caller

use std::collections::HashMap;

use serde::Deserialize;

use crate::constitutive::AlloyFamily;
use crate::elements::Material;
use crate::error::{FEAError, FEAResult};

/// Immutable material catalog
///
/// Lookups of unknown keys fail with [`FEAError::MaterialNotFound`]; there is
/// no fallback record.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    materials: HashMap<String, Material>,
}

/// Catalog entry as read from JSON, the alloy tag being optional
#[derive(Deserialize)]
struct CatalogEntry {
    #[serde(flatten)]
    material: Material,
    #[serde(default)]
    alloy: Option<AlloyFamily>,
}

impl MaterialCatalog {
    pub fn from_materials<I, K>(materials: I) -> Self
    where
        I: IntoIterator<Item = (K, Material)>,
        K: Into<String>,
    {
        Self {
            materials: materials.into_iter().map(|(k, m)| (k.into(), m)).collect(),
        }
    }

    /// Parse a JSON object keyed by designation
    ///
    /// Entries without an explicit `alloy` are tagged from their key, e.g.
    /// `"7075-T6"` becomes a 7xxx alloy.
    pub fn from_json(json: &str) -> FEAResult<Self> {
        let entries: HashMap<String, CatalogEntry> = serde_json::from_str(json)?;
        let materials = entries
            .into_iter()
            .map(|(key, entry)| {
                let alloy = entry
                    .alloy
                    .unwrap_or_else(|| AlloyFamily::from_designation(&key));
                let material = entry.material.with_alloy(alloy);
                (key, material)
            })
            .collect();
        Ok(Self { materials })
    }

    pub fn get(&self, key: &str) -> FEAResult<&Material> {
        self.materials
            .get(key)
            .ok_or_else(|| FEAError::MaterialNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.materials.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Sorted catalog keys
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
