//! Parsing and validation of the externally supplied catalog.

use std::collections::HashSet;

use thiserror::Error;

use crate::item::{CatalogRecord, ItemId};

/// Errors that make a catalog unusable.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog document is not a JSON array of records.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog contains no records.
    #[error("catalog is empty")]
    Empty,

    /// Two records share the same id.
    #[error("duplicate item id in catalog: {0}")]
    DuplicateId(ItemId),
}

/// Parses a JSON catalog of `{id, url, elo}` records.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] for malformed JSON, or any error from
/// [`validate_catalog`].
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
    let records: Vec<CatalogRecord> = serde_json::from_str(text)?;
    validate_catalog(&records)?;
    Ok(records)
}

/// Checks that a catalog is non-empty and that ids are unique.
pub(crate) fn validate_catalog(records: &[CatalogRecord]) -> Result<(), CatalogError> {
    validate_ids(records.iter().map(|record| record.id))
}

/// Checks that a sequence of ids is non-empty and free of duplicates.
pub(crate) fn validate_ids<I>(ids: I) -> Result<(), CatalogError>
where
    I: IntoIterator<Item = ItemId>,
{
    let mut seen: HashSet<ItemId> = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(id));
        }
    }
    if seen.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(())
}
