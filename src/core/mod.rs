pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, MotionConfig, StepMode, VisitorConfig};
pub use types::{ItemId, LatLng, VisitorId};
