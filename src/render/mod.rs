//! Rendering boundary of the map view
//!
//! The simulation never draws anything itself. It talks to a [`RenderSink`]
//! (a Leaflet map in the browser, a terminal canvas, or the in-memory
//! [`RecordingSink`] used headless) through opaque marker handles.

pub mod colors;
pub mod format;
pub mod recording;

pub use colors::Color;
pub use recording::RecordingSink;

use crate::city::ItemCategory;
use crate::core::types::LatLng;

/// Opaque handle to a marker owned by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

/// Everything needed to draw a place marker and its popup
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceVisual {
    pub category: ItemCategory,
    pub glyph: String,
    pub label: String,
    /// Glyph scale factor
    pub scale: f64,
    pub description: String,
    /// Formatted population effect, absent when zero
    pub population_text: Option<String>,
    /// Formatted tax-revenue effect, absent when zero
    pub tax_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisitorVisual {
    pub glyph: &'static str,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VisualSpec {
    Place(PlaceVisual),
    Visitor(VisitorVisual),
}

impl VisualSpec {
    /// Stacking offset; visitors stay behind place labels
    pub fn z_offset(&self) -> i32 {
        match self {
            VisualSpec::Place(_) => 0,
            VisualSpec::Visitor(_) => -100,
        }
    }
}

/// Drawing surface that accepts marker lifecycle calls
///
/// None of these calls are assumed to be free; callers issue at most one
/// call per marker per operation.
pub trait RenderSink {
    fn create_marker(&mut self, position: LatLng, visual: &VisualSpec) -> MarkerHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn update_marker_position(&mut self, handle: MarkerHandle, position: LatLng);

    /// Toggle the walking animation cue of a visitor marker
    fn set_walking_cue(&mut self, _handle: MarkerHandle, _walking: bool) {}
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn create_marker(&mut self, position: LatLng, visual: &VisualSpec) -> MarkerHandle {
        (**self).create_marker(position, visual)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        (**self).remove_marker(handle)
    }

    fn update_marker_position(&mut self, handle: MarkerHandle, position: LatLng) {
        (**self).update_marker_position(handle, position)
    }

    fn set_walking_cue(&mut self, handle: MarkerHandle, walking: bool) {
        (**self).set_walking_cue(handle, walking)
    }
}
