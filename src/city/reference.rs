//! Real-world cities to compare the planned city against

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCity {
    pub name: String,
    pub name_ja: String,
    pub country: String,
    pub population: i64,
    /// Annual tax revenue in yen
    pub tax_revenue: i64,
    pub emoji: String,
}

/// City whose population is closest to `population` (first wins on ties)
pub fn closest_by_population(cities: &[ReferenceCity], population: i64) -> Option<&ReferenceCity> {
    closest_by(cities, |c| c.population, population)
}

/// City whose tax revenue is closest to `tax_revenue` (first wins on ties)
pub fn closest_by_tax_revenue(
    cities: &[ReferenceCity],
    tax_revenue: i64,
) -> Option<&ReferenceCity> {
    closest_by(cities, |c| c.tax_revenue, tax_revenue)
}

fn closest_by(
    cities: &[ReferenceCity],
    key: impl Fn(&ReferenceCity) -> i64,
    value: i64,
) -> Option<&ReferenceCity> {
    let mut best: Option<(&ReferenceCity, u64)> = None;
    for city in cities {
        let diff = key(city).abs_diff(value);
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((city, diff)),
        }
    }
    best.map(|(city, _)| city)
}
