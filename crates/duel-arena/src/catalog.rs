//! Loading the item catalog from disk.

use duel_core::{parse_catalog, CatalogRecord};
use std::path::Path;

use crate::arena::ArenaError;

/// Reads and parses the JSON catalog at `path`.
///
/// # Errors
///
/// Returns [`ArenaError::CatalogUnavailable`] if the file cannot be read and
/// [`ArenaError::Catalog`] if it is not a valid, non-empty catalog.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogRecord>, ArenaError> {
    let text = std::fs::read_to_string(path).map_err(|source| ArenaError::CatalogUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_catalog(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"id": 1, "url": "a", "elo": 1500}]"#).unwrap();

        let records = load_catalog(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn test_missing_catalog_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_catalog(&dir.path().join("nope.json"));
        assert!(matches!(
            result,
            Err(ArenaError::CatalogUnavailable { .. })
        ));
    }

    #[test]
    fn test_unparseable_catalog_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "<html>404</html>").unwrap();

        let result = load_catalog(&path);
        assert!(matches!(result, Err(ArenaError::Catalog(_))));
    }
}
