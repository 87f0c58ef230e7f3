//! Language-model planner
//!
//! The model only proposes map edits. It gets the player's message and a
//! read-only summary of the map, and answers with a reply plus a list of
//! add/remove/update actions that the game layer applies.

pub mod client;
pub mod context;
pub mod parser;

pub use client::{CompletionBackend, LlmClient};
pub use context::MapContext;
pub use parser::{request_plan, PlanResponse, APOLOGY};
