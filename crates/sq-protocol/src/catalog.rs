use serde::{Deserialize, Serialize};

/// A named inventory item with its stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Item name as stored (never empty).
    pub name: String,
    /// Units in stock.
    pub quantity: u64,
}

impl CatalogRecord {
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// A catalog record paired with its similarity to the query (0–100).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub record: CatalogRecord,
    pub score: u8,
}
