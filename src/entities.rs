//! Airport discovery across the whole archive
//!
//! A single report only lists the airports operating that month, so the
//! canonical set is the union over every period of the reference sheet's
//! entity rows, keyed by the 4-character label prefix.
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use crate::category::CategoryLayout;
use crate::extract::TableSet;

/// Synthetic group for the nationwide totals
pub const AGGREGATE_ENTITY: &str = "infraero";

/// Rows per airport block; the first block holds aggregate rows
pub const BLOCK_ROWS: usize = 9;
const PREFIX_CHARS: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("Reference category {category} missing for {year}/{month}")]
    MissingReference {
        year: i32,
        month: String,
        category: usize,
    },
}

/// Entity prefix -> label variants, both in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRegistry {
    keys: Vec<String>,
    variants: HashMap<String, Vec<String>>,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    /// Registry holding only the aggregate entity
    pub fn new() -> Self {
        let mut registry = Self {
            keys: Vec::new(),
            variants: HashMap::new(),
        };
        registry.insert_group(AGGREGATE_ENTITY, AGGREGATE_ENTITY);
        registry
    }

    /// Record `label` under the key derived from its first 4 characters
    pub fn observe(&mut self, label: &str) {
        let key = entity_prefix(label);
        self.insert_group(&key, label);
    }

    fn insert_group(&mut self, key: &str, label: &str) {
        if !self.variants.contains_key(key) {
            self.keys.push(key.to_string());
        }
        let variants = self.variants.entry(key.to_string()).or_default();
        if !variants.iter().any(|v| v == label) {
            variants.push(label.to_string());
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn variants(&self, key: &str) -> Option<&[String]> {
        self.variants.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.keys
            .iter()
            .map(|key| (key.as_str(), self.variants[key].as_slice()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// First 4 characters of a label (the whole label if shorter)
pub fn entity_prefix(label: &str) -> String {
    label.chars().take(PREFIX_CHARS).collect()
}

/// Scan the reference sheet of every period at stride 9 from row 9
#[instrument(skip_all, fields(reference = layout.reference()))]
pub fn discover_entities(
    tables: &TableSet,
    layout: &CategoryLayout,
) -> Result<EntityRegistry, EntityError> {
    let reference = layout.reference();
    let mut registry = EntityRegistry::new();

    for (year, month) in tables.periods() {
        let table = month
            .table(reference)
            .ok_or_else(|| EntityError::MissingReference {
                year,
                month: month.month.clone(),
                category: reference,
            })?;

        let before = registry.len();
        for row in (BLOCK_ROWS..table.height()).step_by(BLOCK_ROWS) {
            match table.label(row) {
                Some(label) if !label.trim().is_empty() => registry.observe(label),
                _ => debug!("{}/{}: no label at entity row {}", year, month.month, row),
            }
        }
        debug!(
            "{}/{}: {} new entities",
            year,
            month.month,
            registry.len() - before
        );
    }

    info!("Discovered {} entities", registry.len());
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_aggregate() {
        let registry = EntityRegistry::new();
        assert_eq!(registry.keys(), &[AGGREGATE_ENTITY.to_string()]);
        assert_eq!(
            registry.variants(AGGREGATE_ENTITY),
            Some(&[AGGREGATE_ENTITY.to_string()][..])
        );
    }

    #[test]
    fn test_variants_deduplicated_in_order() {
        let mut registry = EntityRegistry::new();
        registry.observe("SBGR - GUARULHOS");
        registry.observe("SBSP - CONGONHAS");
        registry.observe("SBGR - GRU AIRPORT");
        registry.observe("SBGR - GUARULHOS");

        assert_eq!(registry.keys(), &["infraero", "SBGR", "SBSP"]);
        assert_eq!(
            registry.variants("SBGR").unwrap(),
            &["SBGR - GUARULHOS", "SBGR - GRU AIRPORT"]
        );
    }

    #[test]
    fn test_short_label_prefix() {
        assert_eq!(entity_prefix("AB"), "AB");
        assert_eq!(entity_prefix("SBGR-X"), "SBGR");
        assert_eq!(entity_prefix("ÁGUA BRANCA"), "ÁGUA");
    }

    #[test]
    fn test_aggregate_prefix_label_joins_existing_group() {
        let mut registry = EntityRegistry::new();
        registry.observe("infraero");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.variants("infr").unwrap(), &["infraero"]);
    }
}
