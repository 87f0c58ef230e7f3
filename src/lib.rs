//! Future City - chat-driven city planning with an animated visitor map
//!
//! The player asks a language model to add, remove or update places on a
//! city map. Every non-decorative place attracts a small crowd of visitors
//! that walk towards it, wobble while walking and occasionally fidget.

pub mod city;
pub mod core;
pub mod game;
pub mod llm;
pub mod render;
pub mod simulation;
