//! Places on the city map and the numbers derived from them
//!
//! A [`MapItem`] is owned by the game layer. The map view only reads items
//! to derive markers and visitor targets.

pub mod catalog;
pub mod reference;
pub mod stats;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::types::{ItemId, LatLng};

/// Category tag of a place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Landmark,
    Infrastructure,
    Nature,
    Entertainment,
    Transport,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Landmark => "landmark",
            ItemCategory::Infrastructure => "infrastructure",
            ItemCategory::Nature => "nature",
            ItemCategory::Entertainment => "entertainment",
            ItemCategory::Transport => "transport",
        }
    }
}

/// A named, positioned place contributing optional population and tax
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapItem {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub category: ItemCategory,
    pub emoji: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Marker scale factor, 1.0 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, deserialize_with = "de_amount", skip_serializing_if = "Option::is_none")]
    pub population: Option<i64>,
    /// Annual tax revenue in yen
    #[serde(default, deserialize_with = "de_amount", skip_serializing_if = "Option::is_none")]
    pub tax_revenue: Option<i64>,
}

impl MapItem {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    pub fn scale(&self) -> f64 {
        self.size.unwrap_or(1.0)
    }

    pub fn population_delta(&self) -> i64 {
        self.population.unwrap_or(0)
    }

    pub fn tax_revenue_delta(&self) -> i64 {
        self.tax_revenue.unwrap_or(0)
    }
}

/// A fully specified place that has not been given an id yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub category: ItemCategory,
    pub emoji: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default, deserialize_with = "de_amount")]
    pub population: Option<i64>,
    #[serde(default, deserialize_with = "de_amount")]
    pub tax_revenue: Option<i64>,
}

impl ItemDraft {
    pub fn into_item(self, id: ItemId) -> MapItem {
        MapItem {
            id,
            name: self.name,
            category: self.category,
            emoji: self.emoji,
            lat: self.lat,
            lng: self.lng,
            description: self.description,
            size: self.size,
            population: self.population,
            tax_revenue: self.tax_revenue,
        }
    }
}

/// Partial set of fields to overwrite on an existing place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub category: Option<ItemCategory>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default, deserialize_with = "de_amount")]
    pub population: Option<i64>,
    #[serde(default, deserialize_with = "de_amount")]
    pub tax_revenue: Option<i64>,
}

impl ItemPatch {
    /// Overwrite the provided fields; the id is never touched
    pub fn apply_to(&self, item: &mut MapItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(emoji) = &self.emoji {
            item.emoji = emoji.clone();
        }
        if let Some(lat) = self.lat {
            item.lat = lat;
        }
        if let Some(lng) = self.lng {
            item.lng = lng;
        }
        if let Some(description) = &self.description {
            item.description = Some(description.clone());
        }
        if let Some(size) = self.size {
            item.size = Some(size);
        }
        if let Some(population) = self.population {
            item.population = Some(population);
        }
        if let Some(tax_revenue) = self.tax_revenue {
            item.tax_revenue = Some(tax_revenue);
        }
    }
}

/// Accept integral amounts written as JSON floats (`2000.0`)
fn de_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| v.round() as i64))
}

#[cfg(test)]
pub(crate) fn test_item(id: &str, lat: f64, lng: f64) -> MapItem {
    MapItem {
        id: ItemId::new(id),
        name: format!("Place {id}"),
        category: ItemCategory::Landmark,
        emoji: "🗼".into(),
        lat,
        lng,
        description: None,
        size: None,
        population: None,
        tax_revenue: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_deserializes_from_model_json() {
        let json = r#"{
            "id": "x1",
            "name": "Space Port",
            "type": "transport",
            "emoji": "🚀",
            "lat": 35.71,
            "lng": 140.66,
            "size": 2.5,
            "population": 150000.0,
            "taxRevenue": 120000000000
        }"#;
        let item: MapItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, ItemCategory::Transport);
        assert_eq!(item.population, Some(150_000));
        assert_eq!(item.tax_revenue, Some(120_000_000_000));
        assert_eq!(item.description, None);
        assert_eq!(item.scale(), 2.5);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let item = test_item("a", 35.7, 140.6);
        assert_eq!(item.scale(), 1.0);
        assert_eq!(item.population_delta(), 0);
        assert_eq!(item.tax_revenue_delta(), 0);
    }

    #[test]
    fn test_patch_preserves_id_and_untouched_fields() {
        let mut item = test_item("keep", 35.7, 140.6);
        item.population = Some(100);
        let patch = ItemPatch {
            name: Some("Renamed".into()),
            tax_revenue: Some(5_000),
            ..Default::default()
        };
        patch.apply_to(&mut item);
        assert_eq!(item.id, ItemId::new("keep"));
        assert_eq!(item.name, "Renamed");
        assert_eq!(item.population, Some(100));
        assert_eq!(item.tax_revenue, Some(5_000));
        assert_eq!(item.lat, 35.7);
    }

    #[test]
    fn test_draft_into_item() {
        let draft: ItemDraft = serde_json::from_str(
            r#"{"name":"Dome","type":"entertainment","emoji":"🏟️","lat":35.72,"lng":140.63}"#,
        )
        .unwrap();
        let item = draft.into_item(ItemId::new("new"));
        assert_eq!(item.id.as_str(), "new");
        assert_eq!(item.category, ItemCategory::Entertainment);
        assert_eq!(item.population, None);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result: Result<ItemPatch, _> = serde_json::from_str(r#"{"type":"castle"}"#);
        assert!(result.is_err());
    }
}
