//! Map summary sent to the planner alongside the player's message

use serde::Serialize;

use crate::city::stats::CityStats;
use crate::city::{ItemCategory, MapItem};
use crate::core::config::CityConfig;

/// One place as the model sees it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextItem {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub category: ItemCategory,
    pub population: Option<i64>,
    pub tax_revenue: Option<i64>,
}

/// Read-only view of the map for prompt construction
pub struct MapContext {
    pub city_name: String,
    pub items: Vec<ContextItem>,
    pub population: i64,
    pub tax_revenue: i64,
    pub remaining_additions: usize,
}

impl MapContext {
    pub fn new(city: &CityConfig, items: &[MapItem], remaining_additions: usize) -> Self {
        let stats = CityStats::from_items(city, items);
        Self {
            city_name: city.name.clone(),
            items: items
                .iter()
                .map(|i| ContextItem {
                    name: i.name.clone(),
                    lat: i.lat,
                    lng: i.lng,
                    category: i.category,
                    population: i.population,
                    tax_revenue: i.tax_revenue,
                })
                .collect(),
            population: stats.population,
            tax_revenue: stats.tax_revenue,
            remaining_additions,
        }
    }

    /// Text block prepended to the player's message
    pub fn summary(&self) -> String {
        let items_json = serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".into());
        format!(
            "City: {}\nPopulation: {}\nTax revenue (JPY): {}\nAdditions left: {}\n\nCurrent Map State (JSON):\n{}\n",
            self.city_name, self.population, self.tax_revenue, self.remaining_additions, items_json
        )
    }
}
