//! Built-in data tables loaded from the TOML files under `data/`

use ahash::AHashSet;
use serde::Deserialize;

use crate::city::reference::ReferenceCity;
use crate::city::MapItem;
use crate::core::error::{CityError, Result};

const INITIAL_ITEMS_TOML: &str = include_str!("../../data/initial_items.toml");
const REFERENCE_CITIES_TOML: &str = include_str!("../../data/reference_cities.toml");

#[derive(Deserialize)]
struct ItemsFile {
    items: Vec<MapItem>,
}

#[derive(Deserialize)]
struct CitiesFile {
    cities: Vec<ReferenceCity>,
}

/// Landmarks on the map when a game starts
pub fn initial_items() -> Result<Vec<MapItem>> {
    parse_items(INITIAL_ITEMS_TOML, "initial_items.toml")
}

/// Real-world cities used for population and tax comparisons
pub fn reference_cities() -> Result<Vec<ReferenceCity>> {
    let file: CitiesFile = toml::from_str(REFERENCE_CITIES_TOML).map_err(|e| CityError::DataError {
        file: "reference_cities.toml",
        reason: e.to_string(),
    })?;
    Ok(file.cities)
}

fn parse_items(content: &str, file: &'static str) -> Result<Vec<MapItem>> {
    let parsed: ItemsFile = toml::from_str(content).map_err(|e| CityError::DataError {
        file,
        reason: e.to_string(),
    })?;

    let mut seen = AHashSet::new();
    for item in &parsed.items {
        if !seen.insert(item.id.clone()) {
            return Err(CityError::DataError {
                file,
                reason: format!("duplicate item id {}", item.id),
            });
        }
    }
    Ok(parsed.items)
}
