//! Visitor pools: spawning, eviction and the visitor record itself
//!
//! Every place that is not pure decoration keeps at least
//! `VisitorConfig::per_item` visitors. Pools only grow through top-up and
//! only shrink when their place disappears.

use std::f64::consts::TAU;

use ahash::{AHashMap, AHashSet};
use rand::Rng;

use crate::city::MapItem;
use crate::core::config::VisitorConfig;
use crate::core::types::{ItemId, LatLng, VisitorId};
use crate::render::colors::{Color, VISITOR_GLYPHS, VISITOR_PALETTE};
use crate::render::{MarkerHandle, RenderSink, VisitorVisual, VisualSpec};

/// Logical state of a visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorState {
    Walking,
    Arrived,
}

/// Decides which places get no visitors
pub type SkipPredicate = Box<dyn Fn(&MapItem) -> bool + Send + Sync>;

/// Skip places whose category is listed and whose name carries a decorative marker
pub fn decorative_filter(config: &VisitorConfig) -> SkipPredicate {
    let categories = config.skip_categories.clone();
    let markers = config.skip_name_markers.clone();
    Box::new(move |item: &MapItem| {
        categories.contains(&item.category)
            && markers.iter().any(|m| item.name.contains(m.as_str()))
    })
}

/// Never skip anything
pub fn no_skip() -> SkipPredicate {
    Box::new(|_| false)
}

/// An animated agent walking towards one place
///
/// Target position and speed are fixed at spawn; only the current position,
/// the state and the cosmetic fidget deadline change afterwards.
#[derive(Debug, Clone)]
pub struct Visitor {
    id: VisitorId,
    marker: MarkerHandle,
    target_id: ItemId,
    target: LatLng,
    speed: f64,
    wobble_offset: f64,
    glyph: &'static str,
    color: Color,
    pub(crate) current: LatLng,
    pub(crate) state: VisitorState,
    pub(crate) fidget_until: Option<f64>,
}

impl Visitor {
    pub fn id(&self) -> VisitorId {
        self.id
    }

    pub fn marker(&self) -> MarkerHandle {
        self.marker
    }

    pub fn target_id(&self) -> &ItemId {
        &self.target_id
    }

    pub fn target(&self) -> LatLng {
        self.target
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn wobble_offset(&self) -> f64 {
        self.wobble_offset
    }

    pub fn glyph(&self) -> &'static str {
        self.glyph
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> LatLng {
        self.current
    }

    pub fn state(&self) -> VisitorState {
        self.state
    }

    pub fn distance_to_target(&self) -> f64 {
        self.current.distance(&self.target)
    }

    /// True while the cosmetic fidget cue is showing
    pub fn is_fidgeting(&self) -> bool {
        self.fidget_until.is_some()
    }
}

/// All visitors of the map view
#[derive(Debug, Default)]
pub struct VisitorPool {
    visitors: Vec<Visitor>,
}

impl VisitorPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Visitor> + '_ {
        self.visitors.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Visitor> + '_ {
        self.visitors.iter_mut()
    }

    pub fn count_for(&self, id: &ItemId) -> usize {
        self.visitors.iter().filter(|v| &v.target_id == id).count()
    }

    pub fn count_in_state(&self, state: VisitorState) -> usize {
        self.visitors.iter().filter(|v| v.state == state).count()
    }

    /// Remove visitors whose place is no longer in `items`
    pub fn evict(&mut self, items: &[MapItem], sink: &mut impl RenderSink) -> usize {
        let active: AHashSet<&ItemId> = items.iter().map(|i| &i.id).collect();
        let before = self.visitors.len();
        self.visitors.retain(|v| {
            let keep = active.contains(&v.target_id);
            if !keep {
                sink.remove_marker(v.marker);
            }
            keep
        });
        before - self.visitors.len()
    }

    /// Spawn visitors until every eligible place has `per_item` of them
    ///
    /// Visitors spawned within `arrival_radius` of their target start out
    /// arrived.
    pub fn top_up(
        &mut self,
        items: &[MapItem],
        skip: &dyn Fn(&MapItem) -> bool,
        config: &VisitorConfig,
        arrival_radius: f64,
        rng: &mut impl Rng,
        sink: &mut impl RenderSink,
    ) -> usize {
        let mut counts: AHashMap<ItemId, usize> = AHashMap::new();
        for visitor in &self.visitors {
            *counts.entry(visitor.target_id.clone()).or_default() += 1;
        }

        let mut spawned = 0;
        for item in items {
            if skip(item) {
                continue;
            }
            let existing = counts.entry(item.id.clone()).or_default();
            let needed = config.per_item.saturating_sub(*existing);
            for _ in 0..needed {
                let visitor = spawn_visitor(item, config, arrival_radius, rng, sink);
                self.visitors.push(visitor);
            }
            *existing += needed;
            spawned += needed;
        }

        spawned
    }

    /// Remove every visitor from the sink
    pub fn clear(&mut self, sink: &mut impl RenderSink) -> usize {
        let count = self.visitors.len();
        for visitor in self.visitors.drain(..) {
            sink.remove_marker(visitor.marker);
        }
        count
    }
}

fn spawn_visitor(
    item: &MapItem,
    config: &VisitorConfig,
    arrival_radius: f64,
    rng: &mut impl Rng,
    sink: &mut impl RenderSink,
) -> Visitor {
    let target = item.position();
    let angle = rng.gen_range(0.0..TAU);
    let distance = rng.gen_range(0.5 * config.spawn_radius..=config.spawn_radius);
    let start = target + LatLng::new(angle.sin() * distance, angle.cos() * distance);

    let glyph = VISITOR_GLYPHS[rng.gen_range(0..VISITOR_GLYPHS.len())];
    let color = VISITOR_PALETTE[rng.gen_range(0..VISITOR_PALETTE.len())];
    let speed = rng.gen_range(config.speed_min..=config.speed_max);
    let wobble_offset = rng.gen_range(0.0..100.0);

    let marker = sink.create_marker(start, &VisualSpec::Visitor(VisitorVisual { glyph, color }));

    let state = if start.distance(&target) < arrival_radius {
        sink.set_walking_cue(marker, false);
        VisitorState::Arrived
    } else {
        VisitorState::Walking
    };

    Visitor {
        id: VisitorId::new(),
        marker,
        target_id: item.id.clone(),
        target,
        speed,
        wobble_offset,
        glyph,
        color,
        current: start,
        state,
        fidget_until: None,
    }
}

#[cfg(test)]
pub(crate) fn test_visitor(
    target_id: &str,
    start: LatLng,
    target: LatLng,
    speed: f64,
    sink: &mut impl RenderSink,
) -> Visitor {
    let glyph = VISITOR_GLYPHS[0];
    let color = VISITOR_PALETTE[0];
    let marker = sink.create_marker(start, &VisualSpec::Visitor(VisitorVisual { glyph, color }));
    Visitor {
        id: VisitorId::new(),
        marker,
        target_id: ItemId::new(target_id),
        target,
        speed,
        wobble_offset: 0.0,
        glyph,
        color,
        current: start,
        state: VisitorState::Walking,
        fidget_until: None,
    }
}

#[cfg(test)]
impl VisitorPool {
    pub(crate) fn push(&mut self, visitor: Visitor) {
        self.visitors.push(visitor);
    }
}
