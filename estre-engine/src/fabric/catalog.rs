//! Fabric Catalog
//!
//! Read-only fabric inventory. The built-in dataset ships with the crate;
//! deployments can point `FABRIC_CATALOG_PATH` at an exported inventory file.

use shared::error::{AppError, AppResult};
use shared::models::{FabricCategory, FabricRecord};
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_FABRICS: &str = include_str!("../../data/fabrics.json");

/// Fabric inventory indexed by code
#[derive(Debug, Clone, Default)]
pub struct FabricCatalog {
    records: Vec<FabricRecord>,
    by_code: HashMap<String, usize>,
}

impl FabricCatalog {
    /// The bundled 15-fabric dataset
    pub fn builtin() -> Self {
        // Bundled data is checked by `test_builtin_dataset`
        Self::from_json_str(BUILTIN_FABRICS).unwrap_or_default()
    }

    /// Build from records; a later duplicate code replaces the earlier one
    pub fn from_records(records: Vec<FabricRecord>) -> Self {
        let mut catalog = Self::default();
        for record in records {
            match catalog.by_code.get(&record.code) {
                Some(&index) => {
                    tracing::warn!(code = %record.code, "Duplicate fabric code, keeping last");
                    catalog.records[index] = record;
                }
                None => {
                    catalog
                        .by_code
                        .insert(record.code.clone(), catalog.records.len());
                    catalog.records.push(record);
                }
            }
        }
        catalog
    }

    /// Parse a JSON array of fabric records
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let records: Vec<FabricRecord> = serde_json::from_str(json)
            .map_err(|e| AppError::catalog(format!("Invalid fabric catalog: {}", e)))?;
        Ok(Self::from_records(records))
    }

    /// Load a fabric catalog file
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::catalog(format!("Failed to read fabric catalog: {}", e))
                .with_detail("path", path.display().to_string())
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), fabrics = catalog.len(), "Fabric catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in catalog order
    pub fn records(&self) -> &[FabricRecord] {
        &self.records
    }

    /// Look up a fabric by its code
    pub fn get(&self, code: &str) -> Option<&FabricRecord> {
        self.by_code.get(code).map(|&index| &self.records[index])
    }

    pub fn by_category(&self, category: FabricCategory) -> Vec<&FabricRecord> {
        self.records
            .iter()
            .filter(|record| record.category == category)
            .collect()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<FabricCategory> {
        let mut categories = Vec::new();
        for record in &self.records {
            if !categories.contains(&record.category) {
                categories.push(record.category);
            }
        }
        categories
    }

    /// Case-insensitive search over description, code, company and collection
    ///
    /// An empty term matches everything; `category` narrows the result.
    pub fn search(&self, term: &str, category: Option<FabricCategory>) -> Vec<&FabricRecord> {
        let needle = term.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| category.is_none_or(|c| record.category == c))
            .filter(|record| {
                needle.is_empty()
                    || [
                        &record.description,
                        &record.code,
                        &record.company,
                        &record.collection,
                    ]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// In-stock fabrics ordered by company
    pub fn in_stock(&self) -> Vec<&FabricRecord> {
        let mut records: Vec<&FabricRecord> =
            self.records.iter().filter(|record| record.in_stock).collect();
        records.sort_by(|a, b| a.company.cmp(&b.company));
        records
    }
}
