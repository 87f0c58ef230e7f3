//! In-memory render sink for headless runs and tests

use ahash::AHashMap;

use crate::core::types::LatLng;
use crate::render::{MarkerHandle, RenderSink, VisualSpec};

#[derive(Debug, Clone)]
pub struct RecordedMarker {
    pub position: LatLng,
    pub visual: VisualSpec,
    pub walking: bool,
    /// Stacking order taken from the visual at creation
    pub z: i32,
}

/// Render sink that keeps live markers in a map and counts every call
#[derive(Debug, Default)]
pub struct RecordingSink {
    next_handle: u64,
    markers: AHashMap<MarkerHandle, RecordedMarker>,
    pub created: usize,
    pub removed: usize,
    pub position_updates: usize,
    /// Calls that referenced a handle which is not live
    pub stale_calls: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.markers.len()
    }

    pub fn get(&self, handle: MarkerHandle) -> Option<&RecordedMarker> {
        self.markers.get(&handle)
    }

    pub fn is_live(&self, handle: MarkerHandle) -> bool {
        self.markers.contains_key(&handle)
    }

    /// Live markers showing places
    pub fn place_markers(&self) -> impl Iterator<Item = &RecordedMarker> + '_ {
        self.markers
            .values()
            .filter(|m| matches!(m.visual, VisualSpec::Place(_)))
    }

    /// Live markers showing visitors
    pub fn visitor_markers(&self) -> impl Iterator<Item = &RecordedMarker> + '_ {
        self.markers
            .values()
            .filter(|m| matches!(m.visual, VisualSpec::Visitor(_)))
    }

    /// Reset call counters, keeping live markers
    pub fn clear_counters(&mut self) {
        self.created = 0;
        self.removed = 0;
        self.position_updates = 0;
        self.stale_calls = 0;
    }
}

impl RenderSink for RecordingSink {
    fn create_marker(&mut self, position: LatLng, visual: &VisualSpec) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.insert(
            handle,
            RecordedMarker {
                position,
                visual: visual.clone(),
                walking: matches!(visual, VisualSpec::Visitor(_)),
                z: visual.z_offset(),
            },
        );
        self.created += 1;
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        if self.markers.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            self.stale_calls += 1;
        }
    }

    fn update_marker_position(&mut self, handle: MarkerHandle, position: LatLng) {
        match self.markers.get_mut(&handle) {
            Some(marker) => {
                marker.position = position;
                self.position_updates += 1;
            }
            None => self.stale_calls += 1,
        }
    }

    fn set_walking_cue(&mut self, handle: MarkerHandle, walking: bool) {
        match self.markers.get_mut(&handle) {
            Some(marker) => marker.walking = walking,
            None => self.stale_calls += 1,
        }
    }
}
