//! Place markers kept in step with the item list

use ahash::AHashMap;

use crate::city::MapItem;
use crate::core::types::ItemId;
use crate::render::format::{population_effect, tax_effect};
use crate::render::{MarkerHandle, PlaceVisual, RenderSink, VisualSpec};

/// One marker per live item, keyed by item id
#[derive(Debug, Default)]
pub struct ItemMarkers {
    handles: AHashMap<ItemId, MarkerHandle>,
}

/// Marker calls issued by one synchronization
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSyncReport {
    pub created: usize,
    pub removed: usize,
}

impl ItemMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handle(&self, id: &ItemId) -> Option<MarkerHandle> {
        self.handles.get(id).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ItemId> + '_ {
        self.handles.keys()
    }

    /// Drop every marker and rebuild one per item
    ///
    /// A rebuild rather than a diff: item lists are a few dozen entries.
    /// Should an id appear twice, the later item owns the marker.
    pub fn sync(&mut self, items: &[MapItem], sink: &mut impl RenderSink) -> MarkerSyncReport {
        let mut report = MarkerSyncReport {
            removed: self.clear(sink),
            ..Default::default()
        };

        for item in items {
            let handle = sink.create_marker(item.position(), &place_visual(item));
            report.created += 1;
            if let Some(previous) = self.handles.insert(item.id.clone(), handle) {
                tracing::warn!(item = %item.id, "duplicate item id, replacing its marker");
                sink.remove_marker(previous);
                report.removed += 1;
            }
        }

        report
    }

    /// Remove every marker from the sink, returning how many were removed
    pub fn clear(&mut self, sink: &mut impl RenderSink) -> usize {
        let count = self.handles.len();
        for (_, handle) in self.handles.drain() {
            sink.remove_marker(handle);
        }
        count
    }
}

/// Marker appearance for a place: glyph, label and effect summary
pub fn place_visual(item: &MapItem) -> VisualSpec {
    VisualSpec::Place(PlaceVisual {
        category: item.category,
        glyph: item.emoji.clone(),
        label: item.name.clone(),
        scale: item.scale(),
        description: item.description.clone().unwrap_or_default(),
        population_text: population_effect(item),
        tax_text: tax_effect(item),
    })
}
