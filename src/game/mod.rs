//! Game rules around the map: planner turns, budget and scores

pub mod actions;
pub mod scores;
pub mod session;

pub use actions::{apply_actions, ApplyOutcome, MapAction};
pub use scores::{HighScore, ScoreBoard};
pub use session::{ChatMessage, ChatRole, GameSession, TurnReport};
