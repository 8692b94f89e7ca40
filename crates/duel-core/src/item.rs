//! Catalog items and the records they are created from.

use serde::{Deserialize, Serialize};

use crate::elo::DEFAULT_RATING;

/// Stable identifier of a catalog item.
pub type ItemId = i64;

/// One entry of the catalog as supplied by the external source.
///
/// Only `elo` is carried over as the starting rating; games played always
/// start at zero. A record without `elo` starts at [`DEFAULT_RATING`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: ItemId,
    pub url: String,
    #[serde(default = "default_elo")]
    pub elo: f64,
}

fn default_elo() -> f64 {
    DEFAULT_RATING
}

/// A rankable item.
///
/// `rating` changes only through Elo updates and `games_played` only when a
/// vote is committed. Serialized in camelCase; `elo` is accepted as an alias
/// of `rating` so older snapshots still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub url: String,
    #[serde(alias = "elo")]
    pub rating: f64,
    #[serde(default)]
    pub games_played: u32,
}

impl Item {
    /// Creates an item that has not been compared yet.
    pub fn new(id: ItemId, url: impl Into<String>, rating: f64) -> Self {
        Self {
            id,
            url: url.into(),
            rating,
            games_played: 0,
        }
    }
}

impl From<CatalogRecord> for Item {
    fn from(record: CatalogRecord) -> Self {
        Item::new(record.id, record.url, record.elo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_record_normalizes_to_unplayed_item() {
        let record = CatalogRecord {
            id: 7,
            url: "/quotes/7.png".to_string(),
            elo: 1500.0,
        };

        let item = Item::from(record);

        assert_eq!(item.id, 7);
        assert_eq!(item.url, "/quotes/7.png");
        assert_eq!(item.rating, 1500.0);
        assert_eq!(item.games_played, 0);
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = Item {
            id: 1,
            url: "a".to_string(),
            rating: 1516.0,
            games_played: 2,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["gamesPlayed"], 2);
        assert_eq!(json["rating"], 1516.0);
    }

    #[test]
    fn test_item_accepts_elo_alias_and_missing_games() {
        let item: Item = serde_json::from_str(r#"{"id":3,"url":"c","elo":1490}"#).unwrap();

        assert_eq!(item.rating, 1490.0);
        assert_eq!(item.games_played, 0);
    }
}
