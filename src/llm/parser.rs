//! Turn the player's message into a reply plus map actions
//!
//! The planner never fails outward: any transport, format, or schema error
//! is logged and replaced by a fixed apology with no actions, so the map is
//! left as it was.

use serde::{Deserialize, Serialize};

use crate::city::MapItem;
use crate::core::config::CityConfig;
use crate::core::error::{CityError, Result};
use crate::game::actions::MapAction;
use crate::llm::client::CompletionBackend;
use crate::llm::context::MapContext;

/// Reply shown when the planner could not produce a usable answer
pub const APOLOGY: &str =
    "申し訳ありません。リクエストの処理中にエラーが発生しました。もう一度お試しください。";

/// What the planner answered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Conversational reply to show the player
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub actions: Vec<MapAction>,
}

impl PlanResponse {
    pub fn apology() -> Self {
        Self {
            text: APOLOGY.into(),
            actions: Vec::new(),
        }
    }
}

/// Ask the planner for a plan; degrades to [`PlanResponse::apology`]
pub async fn request_plan(
    backend: &impl CompletionBackend,
    input: &str,
    items: &[MapItem],
    city: &CityConfig,
    remaining_additions: usize,
) -> PlanResponse {
    match try_request_plan(backend, input, items, city, remaining_additions).await {
        Ok(plan) => {
            tracing::debug!(actions = plan.actions.len(), "planner reply parsed");
            plan
        }
        Err(e) => {
            tracing::warn!(error = %e, "planner request failed, replying with apology");
            PlanResponse::apology()
        }
    }
}

async fn try_request_plan(
    backend: &impl CompletionBackend,
    input: &str,
    items: &[MapItem],
    city: &CityConfig,
    remaining_additions: usize,
) -> Result<PlanResponse> {
    let context = MapContext::new(city, items, remaining_additions);
    let system_prompt = system_prompt(city);
    let user_prompt = format!("{}\nUser Request: \"{}\"", context.summary(), input);

    let response = backend.complete(&system_prompt, &user_prompt).await?;
    parse_plan(&response)
}

/// Parse a raw model reply; one malformed action rejects the whole reply
pub fn parse_plan(response: &str) -> Result<PlanResponse> {
    let json_str = extract_json(response)?;
    serde_json::from_str(json_str).map_err(|e| {
        CityError::LlmError(format!("Failed to parse plan: {} - Response: {}", e, response))
    })
}

/// Extract JSON object from LLM response (handles surrounding text)
fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| CityError::LlmError("No JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| CityError::LlmError("No closing brace found in response".into()))?;
    if end < start {
        return Err(CityError::LlmError("Unbalanced braces in response".into()));
    }
    Ok(&response[start..=end])
}

/// System prompt describing the game, the value scale and the reply format
pub fn system_prompt(city: &CityConfig) -> String {
    format!(
        r#"You are the AI architect in charge of the "future city plan" of {name}.
Chat with the player and place dreamy facilities and landmarks on the map of {name}.

GAME GOAL:
- The player wants to grow the population to {goal} residents and raise annual tax revenue.
- Base population is about {population}, base tax revenue is about {tax} JPY.
- Every added place must carry a population increase ("population") and an annual tax revenue increase in JPY ("taxRevenue") matching its scale.
- The player can only add {budget} places in total, so propose large, exciting numbers.

SCALE GUIDE:
1. Gigantic (theme park, spaceport, undersea city): +100,000 to +300,000 people, +50,000,000,000 to +300,000,000,000 JPY
2. Large (international airport, dome stadium, bullet train station, huge factory): +40,000 to +90,000 people, +10,000,000,000 to +40,000,000,000 JPY
3. Medium (tower apartments, shopping mall, resort hotel): +10,000 to +30,000 people, +3,000,000,000 to +9,000,000,000 JPY
4. Small (park, restaurant, local shop, sightseeing spot): +1,000 to +9,000 people, +100,000,000 to +2,000,000,000 JPY

GEOGRAPHY:
- The city centre is at latitude {lat:.4}, longitude {lng:.4}. Use real coordinates near it.

YOUR ROLE:
- Add, remove or update places on the map as the player asks, and answer questions about the city.
- Be creative. Science-fiction ideas are welcome.
- Reply in Japanese.

OUTPUT FORMAT (JSON only, no explanation):
{{
  "text": "conversational reply",
  "actions": [
    {{"type": "add", "item": {{"name": "...", "emoji": "...", "type": "landmark|infrastructure|nature|entertainment|transport", "lat": 0.0, "lng": 0.0, "description": "...", "size": 1.0, "population": 0, "taxRevenue": 0}}}},
    {{"type": "remove", "targetName": "exact name of the place"}},
    {{"type": "update", "targetName": "exact name of the place", "item": {{"size": 2.0}}}}
  ]
}}
"#,
        name = city.name,
        goal = city.population_goal,
        population = city.base_population,
        tax = city.base_tax_revenue,
        budget = city.max_additional_items,
        lat = city.center.lat,
        lng = city.center.lng,
    )
}
