//! Map edits proposed by the planner and their application

use serde::{Deserialize, Serialize};

use crate::city::{ItemDraft, ItemPatch, MapItem};
use crate::core::types::ItemId;

/// One edit to the item list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MapAction {
    /// Place a new item; the caller assigns its id
    Add { item: ItemDraft },
    /// Remove every item whose name contains `target_name`
    Remove {
        #[serde(rename = "targetName")]
        target_name: String,
    },
    /// Overwrite fields of the first item whose name contains `target_name`
    Update {
        #[serde(rename = "targetName")]
        target_name: String,
        #[serde(default)]
        item: ItemPatch,
    },
}

/// Result of applying a batch of actions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyOutcome {
    pub items: Vec<MapItem>,
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
    /// Target names of remove/update actions that matched nothing
    pub unmatched: Vec<String>,
}

/// Apply `actions` in order to a copy of `items`
///
/// The input slice is untouched; the caller commits `outcome.items` as a
/// whole. Name matching is case-insensitive substring matching, and an
/// empty target name matches nothing.
pub fn apply_actions(
    items: &[MapItem],
    actions: &[MapAction],
    mut next_id: impl FnMut() -> ItemId,
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome {
        items: items.to_vec(),
        ..Default::default()
    };

    for action in actions {
        match action {
            MapAction::Add { item } => {
                outcome.items.push(item.clone().into_item(next_id()));
                outcome.added += 1;
            }
            MapAction::Remove { target_name } => {
                let before = outcome.items.len();
                if let Some(needle) = name_matcher(target_name) {
                    outcome.items.retain(|i| !matches_name(i, &needle));
                }
                let removed = before - outcome.items.len();
                if removed == 0 {
                    outcome.unmatched.push(target_name.clone());
                }
                outcome.removed += removed;
            }
            MapAction::Update { target_name, item: patch } => {
                let found = name_matcher(target_name)
                    .and_then(|needle| outcome.items.iter_mut().find(|i| matches_name(i, &needle)));
                match found {
                    Some(existing) => {
                        patch.apply_to(existing);
                        outcome.updated += 1;
                    }
                    None => outcome.unmatched.push(target_name.clone()),
                }
            }
        }
    }

    outcome
}

fn name_matcher(target: &str) -> Option<String> {
    let needle = target.trim().to_lowercase();
    (!needle.is_empty()).then_some(needle)
}

fn matches_name(item: &MapItem, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
}
