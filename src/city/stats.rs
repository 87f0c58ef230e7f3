//! City totals derived from the item list

use std::time::{Duration, Instant};

use crate::city::MapItem;
use crate::core::config::CityConfig;

/// How long a population change stays visible
pub const DELTA_DISPLAY: Duration = Duration::from_secs(3);

/// Population, tax revenue and progress towards the goal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityStats {
    pub population: i64,
    /// Annual tax revenue in yen
    pub tax_revenue: i64,
    /// Percentage of the population goal reached, capped at 100
    pub progress_percent: f64,
}

impl CityStats {
    pub fn from_items(city: &CityConfig, items: &[MapItem]) -> Self {
        let population =
            city.base_population + items.iter().map(MapItem::population_delta).sum::<i64>();
        let tax_revenue =
            city.base_tax_revenue + items.iter().map(MapItem::tax_revenue_delta).sum::<i64>();
        let progress_percent =
            (population as f64 / city.population_goal as f64 * 100.0).min(100.0);

        Self {
            population,
            tax_revenue,
            progress_percent,
        }
    }

    pub fn goal_reached(&self) -> bool {
        self.progress_percent >= 100.0
    }
}

/// Remembers the last population change for a short popup
#[derive(Debug, Clone)]
pub struct DeltaTracker {
    last_population: i64,
    recent: Option<(i64, Instant)>,
}

impl DeltaTracker {
    pub fn new(population: i64) -> Self {
        Self {
            last_population: population,
            recent: None,
        }
    }

    /// Record the current population; a change restarts the display window
    pub fn observe(&mut self, population: i64, now: Instant) {
        let diff = population - self.last_population;
        if diff != 0 {
            self.recent = Some((diff, now));
        }
        self.last_population = population;
    }

    /// Forget any pending change and adopt a new baseline
    pub fn reset(&mut self, population: i64) {
        self.last_population = population;
        self.recent = None;
    }

    /// The most recent change if it is still within the display window
    pub fn current(&self, now: Instant) -> Option<i64> {
        match self.recent {
            Some((diff, at)) if now.saturating_duration_since(at) < DELTA_DISPLAY => Some(diff),
            _ => None,
        }
    }
}
