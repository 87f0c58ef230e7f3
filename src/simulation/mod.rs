//! Visitor simulation and marker synchronization of the map view
//!
//! Two flows share [`SimulationState`]: reconciliation when the item list
//! changes ([`markers`], [`visitors`]) and the per-frame [`motion`] step.
//! Both need `&mut` access through [`view::MapView`], so they can never
//! interleave.

pub mod driver;
pub mod markers;
pub mod motion;
pub mod view;
pub mod visitors;

pub use driver::{run_frames, FrameSummary};
pub use markers::ItemMarkers;
pub use motion::{MotionStepper, StepReport};
pub use view::{MapView, ReconcileReport};
pub use visitors::{Visitor, VisitorPool, VisitorState};

/// Markers and visitors owned by one map view
#[derive(Debug, Default)]
pub struct SimulationState {
    pub markers: ItemMarkers,
    pub visitors: VisitorPool,
}
