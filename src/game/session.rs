//! One play-through: the map, the chat transcript and the turn budget

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::city::catalog;
use crate::city::reference::{closest_by_population, closest_by_tax_revenue, ReferenceCity};
use crate::city::stats::{CityStats, DeltaTracker};
use crate::city::MapItem;
use crate::core::config::CityConfig;
use crate::core::error::Result;
use crate::core::types::ItemId;
use crate::game::actions::apply_actions;
use crate::game::scores::{HighScore, ScoreBoard};
use crate::llm::client::CompletionBackend;
use crate::llm::parser::request_plan;

/// Reply used when the planner changed the map without saying anything
pub const DEFAULT_REPLY: &str = "地図を更新しました！";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: ItemId::generate().0,
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// What one accepted message did to the map
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub reply: String,
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
    pub game_over: bool,
}

pub struct GameSession {
    city: CityConfig,
    initial_items: Vec<MapItem>,
    items: Vec<MapItem>,
    messages: Vec<ChatMessage>,
    added_count: usize,
    game_over: bool,
    delta: DeltaTracker,
    reference_cities: Vec<ReferenceCity>,
    scores: ScoreBoard,
}

impl GameSession {
    /// Start a session on the built-in landmark set
    pub fn new(city: CityConfig, scores: ScoreBoard) -> Result<Self> {
        let initial_items = catalog::initial_items()?;
        let reference_cities = catalog::reference_cities()?;
        Ok(Self::with_items(city, initial_items, reference_cities, scores))
    }

    pub fn with_items(
        city: CityConfig,
        initial_items: Vec<MapItem>,
        reference_cities: Vec<ReferenceCity>,
        scores: ScoreBoard,
    ) -> Self {
        let population = CityStats::from_items(&city, &initial_items).population;
        Self {
            items: initial_items.clone(),
            initial_items,
            messages: Vec::new(),
            added_count: 0,
            game_over: false,
            delta: DeltaTracker::new(population),
            reference_cities,
            scores,
            city,
        }
    }

    pub fn items(&self) -> &[MapItem] {
        &self.items
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn added_count(&self) -> usize {
        self.added_count
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn remaining_turns(&self) -> usize {
        self.city.max_additional_items.saturating_sub(self.added_count)
    }

    pub fn stats(&self) -> CityStats {
        CityStats::from_items(&self.city, &self.items)
    }

    /// Population change of the last turn while it is still on display
    pub fn population_delta(&self, now: Instant) -> Option<i64> {
        self.delta.current(now)
    }

    pub fn closest_city_by_population(&self) -> Option<&ReferenceCity> {
        closest_by_population(&self.reference_cities, self.stats().population)
    }

    pub fn closest_city_by_tax_revenue(&self) -> Option<&ReferenceCity> {
        closest_by_tax_revenue(&self.reference_cities, self.stats().tax_revenue)
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    /// Send one player message to the planner and apply its actions
    ///
    /// Returns `None` without contacting the planner when the turn budget
    /// is used up or the message is blank.
    pub async fn send_message(
        &mut self,
        backend: &impl CompletionBackend,
        text: &str,
    ) -> Option<TurnReport> {
        let text = text.trim();
        if self.added_count >= self.city.max_additional_items || text.is_empty() {
            tracing::debug!(added = self.added_count, "message refused");
            return None;
        }

        self.messages.push(ChatMessage::new(ChatRole::User, text));

        let remaining = self.remaining_turns();
        let plan = request_plan(backend, text, &self.items, &self.city, remaining).await;
        let outcome = apply_actions(&self.items, &plan.actions, ItemId::generate);
        for name in &outcome.unmatched {
            tracing::warn!(target_name = %name, "planner action matched no place");
        }

        self.items = outcome.items;
        self.added_count += outcome.added;
        if self.added_count >= self.city.max_additional_items {
            self.game_over = true;
        }
        self.delta.observe(self.stats().population, Instant::now());

        let reply = if plan.text.trim().is_empty() {
            DEFAULT_REPLY.to_string()
        } else {
            plan.text
        };
        self.messages.push(ChatMessage::new(ChatRole::Model, reply.clone()));

        tracing::info!(
            added = outcome.added,
            removed = outcome.removed,
            updated = outcome.updated,
            used = self.added_count,
            game_over = self.game_over,
            "turn applied"
        );

        Some(TurnReport {
            reply,
            added: outcome.added,
            removed: outcome.removed,
            updated: outcome.updated,
            game_over: self.game_over,
        })
    }

    /// Store the current population under `name`
    pub fn register_score(&mut self, name: &str) -> Result<HighScore> {
        let score = self.stats().population;
        self.scores.register(name, score)
    }

    /// Back to the initial landmarks with an empty transcript
    pub fn restart(&mut self) {
        self.items = self.initial_items.clone();
        self.messages.clear();
        self.added_count = 0;
        self.game_over = false;
        self.delta.reset(self.stats().population);
        tracing::info!("session restarted");
    }
}
