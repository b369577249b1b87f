//! Action dispatcher — validates an [`Intent`] against the action schema
//! and executes the matching inventory operation.
//!
//! Every intent-level failure (unknown action, missing or invalid
//! parameters, entity not found) becomes user-facing display text; only a
//! storage failure propagates as an error, since the core cannot recover
//! from a store that is down.

use std::sync::Arc;
use stockchat_core::error::Error;
use stockchat_core::intent::{ActionParams, Intent};
use stockchat_core::item::{InventoryStore, ItemRecord, NewItem};
use tracing::{debug, warn};

/// Parameter value kinds accepted by the action schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    /// A non-negative integer (quantities) or any integer (ids).
    Integer,
}

/// One parameter in an action's schema.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Whether negative integers are rejected (quantity fields).
    pub non_negative: bool,
}

const fn text(name: &'static str, required: bool) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Text,
        required,
        non_negative: false,
    }
}

const fn integer(name: &'static str, required: bool, non_negative: bool) -> ParamSpec {
    ParamSpec {
        name,
        kind: ParamKind::Integer,
        required,
        non_negative,
    }
}

/// The static action schema — fixed at three entries.
pub const ACTION_SCHEMA: [(&str, &[ParamSpec]); 3] = [
    (
        "add_item",
        &[
            text("name", true),
            text("description", false),
            integer("quantity", false, true),
            text("category", false),
        ],
    ),
    ("list_items", &[text("category", false)]),
    (
        "update_quantity",
        &[
            integer("item_id", true, false),
            integer("new_quantity", true, true),
        ],
    ),
];

/// Why validation rejected a parameter map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Required keys are absent.
    Missing(Vec<&'static str>),
    /// The region was malformed JSON, or a present key has the wrong type.
    Invalid(String),
}

/// Validate `params` against the schema for `action`.
///
/// Unknown keys are ignored; missing required keys and mistyped present
/// keys are rejected with distinct failures. Returns the parameter map on
/// success — defaults are applied later, at the point of use.
pub fn validate_params(
    action: &str,
    params: &ActionParams,
    specs: &[ParamSpec],
) -> std::result::Result<serde_json::Map<String, serde_json::Value>, ValidationFailure> {
    let map = match params {
        ActionParams::Object(map) => map,
        ActionParams::Malformed => {
            return Err(ValidationFailure::Invalid(format!(
                "{action}: parameter block was not valid JSON"
            )));
        }
    };

    let missing: Vec<&'static str> = specs
        .iter()
        .filter(|s| s.required && !map.contains_key(s.name))
        .map(|s| s.name)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationFailure::Missing(missing));
    }

    for spec in specs {
        let Some(value) = map.get(spec.name) else {
            continue;
        };
        match spec.kind {
            ParamKind::Text => {
                if !value.is_string() {
                    return Err(ValidationFailure::Invalid(format!(
                        "{action}: '{}' must be text",
                        spec.name
                    )));
                }
            }
            ParamKind::Integer => {
                let Some(n) = value.as_i64() else {
                    return Err(ValidationFailure::Invalid(format!(
                        "{action}: '{}' must be an integer",
                        spec.name
                    )));
                };
                if spec.non_negative && n < 0 {
                    return Err(ValidationFailure::Invalid(format!(
                        "{action}: '{}' must not be negative",
                        spec.name
                    )));
                }
            }
        }
    }

    Ok(map.clone())
}

/// Format one record for the `list_items` reply.
fn format_item(item: &ItemRecord) -> String {
    format!(
        "{}: {} ({}) - {}",
        item.id, item.name, item.quantity, item.description
    )
}

/// Dispatches validated intents against the inventory store.
pub struct Dispatcher {
    store: Arc<dyn InventoryStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Turn one intent into display text.
    ///
    /// `Err` is reserved for storage-collaborator failures; everything else
    /// — including every malformed model output — is `Ok` display text so a
    /// bad turn never ends the session.
    pub async fn dispatch(&self, intent: Intent) -> std::result::Result<String, Error> {
        match intent {
            Intent::DirectAnswer { text } => Ok(text),
            Intent::Unparseable { raw } => Ok(raw),
            Intent::ActionCall { name, params } => self.dispatch_action(&name, &params).await,
        }
    }

    async fn dispatch_action(
        &self,
        name: &str,
        params: &ActionParams,
    ) -> std::result::Result<String, Error> {
        let Some((_, specs)) = ACTION_SCHEMA.iter().find(|(n, _)| *n == name) else {
            warn!(action = name, "unknown action requested");
            return Ok("Unknown action".to_string());
        };

        let map = match validate_params(name, params, specs) {
            Ok(map) => map,
            Err(ValidationFailure::Missing(keys)) => {
                return Ok(format!("{name}: missing parameters: {}", keys.join(", ")));
            }
            Err(ValidationFailure::Invalid(reason)) => {
                debug!(action = name, %reason, "parameter validation failed");
                return Ok(format!("{name}: invalid parameters"));
            }
        };

        match name {
            "add_item" => {
                let item = NewItem {
                    name: str_param(&map, "name").unwrap_or_default(),
                    description: str_param(&map, "description").unwrap_or_default(),
                    quantity: map.get("quantity").and_then(|v| v.as_i64()).unwrap_or(0),
                    category: str_param(&map, "category").unwrap_or_default(),
                };
                let item_name = item.name.clone();
                self.store.insert_item(item).await?;
                Ok(format!("Added item: {item_name}"))
            }
            "list_items" => {
                let category = str_param(&map, "category");
                let items = self.store.list_items(category.as_deref()).await?;
                if items.is_empty() {
                    Ok("No items found.".to_string())
                } else {
                    Ok(items
                        .iter()
                        .map(format_item)
                        .collect::<Vec<_>>()
                        .join("\n"))
                }
            }
            "update_quantity" => {
                // Validation guarantees both keys are present integers.
                let item_id = map.get("item_id").and_then(|v| v.as_i64()).unwrap_or(0);
                let new_quantity = map
                    .get("new_quantity")
                    .and_then(|v| v.as_i64())
                    .unwrap_or(0);

                let Some(item) = self.store.find_item_by_id(item_id).await? else {
                    return Ok("Item not found".to_string());
                };
                // The row can vanish between the lookup and the update.
                let updated = self
                    .store
                    .update_item_quantity(item_id, new_quantity)
                    .await?;
                if !updated {
                    return Ok("Item not found".to_string());
                }
                Ok(format!("Updated {} quantity to {new_quantity}", item.name))
            }
            // Unreachable: the schema lookup above covers the full set.
            other => Ok(format!("Unknown action: {other}")),
        }
    }
}

fn str_param(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    map.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

// ── Tests ─────────────────────────────────────────────────────────────────
