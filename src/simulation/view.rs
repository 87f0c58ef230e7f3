//! The map view: owner of the simulation state and of the render sink
//!
//! Mounting a view acquires nothing but memory; every marker it creates
//! afterwards is released by [`MapView::teardown`], which also runs on drop.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::city::MapItem;
use crate::core::config::{AppConfig, MotionConfig, VisitorConfig};
use crate::render::RenderSink;
use crate::simulation::motion::{MotionStepper, StepReport};
use crate::simulation::visitors::{decorative_filter, SkipPredicate};
use crate::simulation::SimulationState;

/// What one reconciliation did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    /// The list equalled the previous snapshot and nothing ran
    pub unchanged: bool,
    pub markers_created: usize,
    pub markers_removed: usize,
    pub visitors_evicted: usize,
    pub visitors_spawned: usize,
}

pub struct MapView<S: RenderSink> {
    sink: S,
    state: SimulationState,
    stepper: MotionStepper,
    visitor_config: VisitorConfig,
    motion_config: MotionConfig,
    skip: SkipPredicate,
    rng: ChaCha8Rng,
    last_items: Option<Vec<MapItem>>,
    mounted: bool,
}

impl<S: RenderSink> MapView<S> {
    /// Mount a view drawing into `sink`
    pub fn mount(sink: S, config: &AppConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        tracing::debug!(seed = ?config.seed, "map view mounted");

        Self {
            sink,
            state: SimulationState::default(),
            stepper: MotionStepper::new(),
            visitor_config: config.visitors.clone(),
            motion_config: config.motion.clone(),
            skip: decorative_filter(&config.visitors),
            rng,
            last_items: None,
            mounted: true,
        }
    }

    /// Replace the rule deciding which places get no visitors
    pub fn with_skip_predicate(mut self, skip: SkipPredicate) -> Self {
        self.skip = skip;
        self
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Reconcile markers and visitors against a fresh item snapshot
    ///
    /// Eviction runs before top-up, and both finish before the call returns,
    /// so the next tick never sees a visitor of a removed place.
    pub fn set_items(&mut self, items: &[MapItem]) -> ReconcileReport {
        if !self.mounted {
            tracing::warn!("set_items on a torn down map view");
            return ReconcileReport { unchanged: true, ..Default::default() };
        }
        if self.last_items.as_deref() == Some(items) {
            return ReconcileReport { unchanged: true, ..Default::default() };
        }

        let markers = self.state.markers.sync(items, &mut self.sink);
        let visitors_evicted = self.state.visitors.evict(items, &mut self.sink);
        let visitors_spawned = self.state.visitors.top_up(
            items,
            &*self.skip,
            &self.visitor_config,
            self.motion_config.arrival_radius,
            &mut self.rng,
            &mut self.sink,
        );
        self.last_items = Some(items.to_vec());

        let report = ReconcileReport {
            unchanged: false,
            markers_created: markers.created,
            markers_removed: markers.removed,
            visitors_evicted,
            visitors_spawned,
        };
        tracing::debug!(
            items = items.len(),
            evicted = report.visitors_evicted,
            spawned = report.visitors_spawned,
            visitors = self.state.visitors.len(),
            "reconciled map view"
        );
        report
    }

    /// Advance every visitor by one frame
    pub fn tick(&mut self, now_ms: f64) -> StepReport {
        if !self.mounted {
            return StepReport::default();
        }
        self.stepper.step(
            &mut self.state.visitors,
            now_ms,
            &self.motion_config,
            &mut self.rng,
            &mut self.sink,
        )
    }

    /// Release every visitor and marker; later calls are no-ops
    pub fn teardown(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        let visitors = self.state.visitors.clear(&mut self.sink);
        let markers = self.state.markers.clear(&mut self.sink);
        self.last_items = None;
        tracing::debug!(visitors, markers, "map view torn down");
    }
}

impl<S: RenderSink> Drop for MapView<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::test_item;
    use crate::render::RecordingSink;
    use crate::simulation::visitors::no_skip;

    fn seeded() -> AppConfig {
        AppConfig {
            seed: Some(11),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_reconcile_single_item() {
        let mut sink = RecordingSink::new();
        let mut view = MapView::mount(&mut sink, &seeded());

        let report = view.set_items(&[test_item("a", 35.70, 140.60)]);
        assert_eq!(report.markers_created, 1);
        assert_eq!(report.visitors_spawned, 8);
        assert_eq!(view.state().markers.len(), 1);
        assert_eq!(view.state().visitors.len(), 8);
    }

    #[test]
    fn test_unchanged_list_is_a_no_op() {
        let mut sink = RecordingSink::new();
        let items = vec![test_item("a", 35.70, 140.60)];
        {
            let mut view = MapView::mount(&mut sink, &seeded());
            view.set_items(&items);
            let report = view.set_items(&items);
            assert!(report.unchanged);
            assert_eq!(view.sink().created, 9);
        }
    }

    #[test]
    fn test_changed_list_rebuilds_markers_but_keeps_visitors() {
        let mut sink = RecordingSink::new();
        let mut view = MapView::mount(&mut sink, &seeded());
        let a = test_item("a", 35.70, 140.60);
        view.set_items(&[a.clone()]);
        let before: Vec<_> = view.state().visitors.iter().map(|v| v.id()).collect();

        let report = view.set_items(&[a, test_item("b", 35.72, 140.64)]);
        assert_eq!(report.markers_removed, 1);
        assert_eq!(report.markers_created, 2);
        assert_eq!(report.visitors_evicted, 0);
        assert_eq!(report.visitors_spawned, 8);
        let after: Vec<_> = view.state().visitors.iter().map(|v| v.id()).collect();
        assert!(before.iter().all(|id| after.contains(id)));
    }

    #[test]
    fn test_removed_item_is_never_stepped_again() {
        let mut sink = RecordingSink::new();
        {
            let mut view = MapView::mount(&mut sink, &seeded());
            view.set_items(&[test_item("a", 35.70, 140.60), test_item("b", 35.72, 140.64)]);
            view.tick(0.0);
            view.set_items(&[test_item("b", 35.72, 140.64)]);
            let report = view.tick(16.0);
            assert!(report.moved + report.arrived <= 8);
            assert!(view.state().visitors.iter().all(|v| v.target_id().as_str() == "b"));
        }
        assert_eq!(sink.stale_calls, 0);
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let mut sink = RecordingSink::new();
        {
            let mut view = MapView::mount(&mut sink, &seeded());
            view.set_items(&[test_item("a", 35.70, 140.60)]);
            view.teardown();
            assert!(!view.is_mounted());
            assert_eq!(view.tick(16.0), StepReport::default());
            assert!(view.set_items(&[test_item("b", 35.0, 140.0)]).unchanged);
        }
        assert_eq!(sink.live_count(), 0);
        assert_eq!(sink.removed, 9);
        assert_eq!(sink.stale_calls, 0);
    }

    #[test]
    fn test_drop_releases_markers() {
        let mut sink = RecordingSink::new();
        {
            let mut view = MapView::mount(&mut sink, &seeded());
            view.set_items(&[test_item("a", 35.70, 140.60)]);
        }
        assert_eq!(sink.live_count(), 0);
    }

    #[test]
    fn test_custom_skip_predicate() {
        let mut sink = RecordingSink::new();
        let mut view = MapView::mount(&mut sink, &seeded())
            .with_skip_predicate(Box::new(|item: &MapItem| item.id.as_str() == "a"));
        view.set_items(&[test_item("a", 35.70, 140.60), test_item("b", 35.72, 140.64)]);
        assert_eq!(view.state().visitors.len(), 8);
        assert_eq!(view.state().markers.len(), 2);

        let mut other = RecordingSink::new();
        let mut all = MapView::mount(&mut other, &seeded()).with_skip_predicate(no_skip());
        all.set_items(&[test_item("a", 35.70, 140.60)]);
        assert_eq!(all.state().visitors.len(), 8);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let items = vec![test_item("a", 35.70, 140.60)];
        let mut first = RecordingSink::new();
        let mut second = RecordingSink::new();
        let mut a = MapView::mount(&mut first, &seeded());
        let mut b = MapView::mount(&mut second, &seeded());
        a.set_items(&items);
        b.set_items(&items);

        let pa: Vec<_> = a.state().visitors.iter().map(|v| v.position()).collect();
        let pb: Vec<_> = b.state().visitors.iter().map(|v| v.position()).collect();
        assert_eq!(pa, pb);
    }
}
