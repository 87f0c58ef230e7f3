//! Property tests for reconciliation of the map view
//!
//! Random item lists (with repeated reconciliation and removals) must
//! always leave exactly one marker per id and a full pool per place.

use proptest::prelude::*;

use future_city::city::{ItemCategory, MapItem};
use future_city::core::config::AppConfig;
use future_city::core::types::ItemId;
use future_city::render::RecordingSink;
use future_city::simulation::visitors::no_skip;
use future_city::simulation::MapView;

fn item(n: usize, lat: f64, lng: f64) -> MapItem {
    MapItem {
        id: ItemId::new(format!("item-{n}")),
        name: format!("Place {n}"),
        category: ItemCategory::Landmark,
        emoji: "🏛️".into(),
        lat,
        lng,
        description: None,
        size: None,
        population: None,
        tax_revenue: None,
    }
}

fn items_strategy() -> impl Strategy<Value = Vec<MapItem>> {
    prop::collection::vec((35.60f64..35.80, 140.50f64..140.80), 0..12).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(n, (lat, lng))| item(n, lat, lng))
            .collect()
    })
}

fn view(seed: u64) -> MapView<RecordingSink> {
    let config = AppConfig {
        seed: Some(seed),
        ..AppConfig::default()
    };
    MapView::mount(RecordingSink::new(), &config).with_skip_predicate(no_skip())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn markers_match_item_ids(items in items_strategy(), seed in any::<u64>()) {
        let mut view = view(seed);
        view.set_items(&items);

        let mut marker_ids: Vec<&ItemId> = view.state().markers.ids().collect();
        marker_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        let mut item_ids: Vec<&ItemId> = items.iter().map(|i| &i.id).collect();
        item_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        prop_assert_eq!(marker_ids, item_ids);
        prop_assert_eq!(view.sink().live_count(), items.len() * 9);
    }

    #[test]
    fn reconciliation_is_idempotent(items in items_strategy(), frames in 0usize..50) {
        let mut view = view(1);
        view.set_items(&items);
        for frame in 1..=frames {
            view.tick(frame as f64 * 16.0);
        }

        let visitors_before = view.state().visitors.len();
        let live_before = view.sink().live_count();
        let report = view.set_items(&items.clone());

        prop_assert!(report.unchanged);
        prop_assert_eq!(view.state().visitors.len(), visitors_before);
        prop_assert_eq!(view.sink().live_count(), live_before);
    }

    #[test]
    fn removed_places_lose_their_visitors(
        items in items_strategy(),
        keep in prop::collection::vec(any::<bool>(), 12),
        frames in 0usize..30,
    ) {
        let mut view = view(2);
        view.set_items(&items);
        for frame in 1..=frames {
            view.tick(frame as f64 * 16.0);
        }

        let kept: Vec<MapItem> = items
            .iter()
            .zip(keep.iter())
            .filter(|(_, keep)| **keep)
            .map(|(item, _)| item.clone())
            .collect();
        view.set_items(&kept);

        for item in &items {
            let expected = if kept.contains(item) { 8 } else { 0 };
            prop_assert_eq!(view.state().visitors.count_for(&item.id), expected);
        }
        prop_assert_eq!(view.state().visitors.len(), kept.len() * 8);
        prop_assert_eq!(view.state().markers.len(), kept.len());

        for frame in 1..=5 {
            view.tick((frames + frame) as f64 * 16.0);
        }
        prop_assert_eq!(view.sink().stale_calls, 0);
    }
}
