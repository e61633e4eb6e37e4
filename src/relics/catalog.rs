//! Relic catalog and its lenient JSON decoding.
//!
//! Relic payloads are decoded once, here, into [`RelicEffect`] values.
//! Decoding is forgiving below the document level:
//!
//! - an entry with an unknown trigger tag is skipped and logged
//! - a numeric field holding a non-number decodes as zero and is logged
//! - an unparseable condition decodes as `Never`, so only the fallback
//!   (if any) can apply
//!
//! Only a document that is not a JSON array, or one that repeats an id,
//! is rejected.
//!
//! ## Document shape
//!
//! ```json
//! [
//!   { "id": "etherGem", "name": "Ether Gem", "rarity": "rare",
//!     "trigger": "PASSIVE", "effect": { "comboMultiplierPerCard": 2.0 } },
//!   { "id": "bandage", "name": "Bandage", "trigger": "ON_TURN_END",
//!     "condition": "is_damaged", "effect": { "heal": 3 } }
//! ]
//! ```

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use smallvec::SmallVec;
use tracing::warn;

use crate::cards::Rarity;
use crate::combat::StatusGrant;
use crate::core::CatalogError;
use crate::ether::EtherModifier;

use super::condition::RelicCondition;
use super::definition::{
    PassiveStats, RelicChanges, RelicDefinition, RelicEffect, RelicId, RelicTrigger, TriggeredEffect,
};

/// Catalog of relic definitions keyed by id.
#[derive(Clone, Debug, Default)]
pub struct RelicCatalog {
    relics: FxHashMap<RelicId, RelicDefinition>,
}

impl RelicCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON array of relic entries.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for entry in &entries {
            if let Some(relic) = decode_relic(entry) {
                catalog.register(relic)?;
            }
        }
        Ok(catalog)
    }

    /// Register a relic definition.
    pub fn register(&mut self, relic: RelicDefinition) -> Result<(), CatalogError> {
        if self.relics.contains_key(&relic.id) {
            return Err(CatalogError::DuplicateId {
                kind: "relic",
                id: relic.id.0,
            });
        }
        self.relics.insert(relic.id.clone(), relic);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &RelicId) -> Option<&RelicDefinition> {
        self.relics.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &RelicId) -> bool {
        self.relics.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relics.is_empty()
    }
}

/// Decode one catalog entry. Returns `None` for entries that cannot be
/// placed under any trigger.
pub fn decode_relic(entry: &Value) -> Option<RelicDefinition> {
    let Some(obj) = entry.as_object() else {
        warn!("relic entry is not an object; skipped");
        return None;
    };
    let Some(id) = obj.get("id").and_then(Value::as_str) else {
        warn!("relic entry without a string id; skipped");
        return None;
    };
    let trigger_tag = obj.get("trigger").and_then(Value::as_str).unwrap_or("");
    let Some(trigger) = RelicTrigger::from_tag(trigger_tag) else {
        warn!(relic = id, trigger = trigger_tag, "unknown relic trigger; skipped");
        return None;
    };

    let name = obj.get("name").and_then(Value::as_str).unwrap_or(id).to_string();
    let rarity = match obj.get("rarity") {
        None => Rarity::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|_| {
            warn!(relic = id, "malformed rarity; using common");
            Rarity::default()
        }),
    };

    let empty = Map::new();
    let payload = match obj.get("effect") {
        None => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => {
            warn!(relic = id, "relic effect is not an object; treated as empty");
            &empty
        }
    };

    let effect = if trigger == RelicTrigger::Passive {
        RelicEffect::Passive {
            stats: decode_passive(id, payload),
            ether: decode_ether_modifier(id, payload),
        }
    } else {
        let condition = match obj.get("condition") {
            None => RelicCondition::Always,
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|_| {
                warn!(relic = id, "malformed condition; main effect disabled");
                RelicCondition::Never
            }),
        };
        let fallback = match obj.get("fallback") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(decode_changes(id, map)),
            Some(_) => {
                warn!(relic = id, "relic fallback is not an object; ignored");
                None
            }
        };
        RelicEffect::Triggered {
            trigger,
            effect: TriggeredEffect {
                changes: decode_changes(id, payload),
                condition,
                fallback,
            },
        }
    };

    Some(RelicDefinition {
        id: RelicId::new(id),
        name,
        rarity,
        effect,
    })
}

fn decode_passive(relic: &str, payload: &Map<String, Value>) -> PassiveStats {
    PassiveStats {
        max_energy: int_field(relic, payload, "maxEnergy"),
        max_hp: int_field(relic, payload, "maxHp"),
        max_submit_cards: int_field(relic, payload, "maxSubmitCards"),
        max_speed: int_field(relic, payload, "maxSpeed"),
        hand_size: int_field(relic, payload, "handSize"),
        strength: int_field(relic, payload, "strength"),
        ether_card_multiplier: float_field(relic, payload, "etherCardMultiplier"),
    }
}

/// A relic carries at most one ether modifier. When several keys are
/// present the first in this order wins: `comboMultiplierPerCard`,
/// `etherMultiplier`, `referenceBook`, `fiveCardBonus`.
fn decode_ether_modifier(relic: &str, payload: &Map<String, Value>) -> Option<EtherModifier> {
    let mut found: SmallVec<[EtherModifier; 4]> = SmallVec::new();
    if payload.contains_key("comboMultiplierPerCard") {
        found.push(EtherModifier::PerCard {
            bonus: float_field(relic, payload, "comboMultiplierPerCard"),
        });
    }
    if payload.contains_key("etherMultiplier") {
        found.push(EtherModifier::Factor {
            factor: float_field(relic, payload, "etherMultiplier"),
        });
    }
    if payload.get("referenceBook").and_then(Value::as_bool) == Some(true) {
        found.push(EtherModifier::ReferenceBook);
    }
    if payload.contains_key("fiveCardBonus") {
        found.push(EtherModifier::FiveCardBonus {
            factor: float_field(relic, payload, "fiveCardBonus"),
        });
    }

    if found.len() > 1 {
        warn!(relic, kept = ?found[0], "relic defines several ether modifiers; keeping the first");
    }
    found.first().copied()
}

fn decode_changes(relic: &str, payload: &Map<String, Value>) -> RelicChanges {
    let ether = int_field(relic, payload, "ether");
    let statuses = match payload.get("statuses") {
        None => SmallVec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match serde_json::from_value::<StatusGrant>(item.clone()) {
                Ok(grant) => Some(grant),
                Err(_) => {
                    warn!(relic, "malformed status grant; ignored");
                    None
                }
            })
            .collect(),
        Some(_) => {
            warn!(relic, "statuses is not an array; ignored");
            SmallVec::new()
        }
    };

    RelicChanges {
        heal: int_field(relic, payload, "heal"),
        block: int_field(relic, payload, "block"),
        strength: int_field(relic, payload, "strength"),
        energy: int_field(relic, payload, "energy"),
        ether: u64::try_from(ether).unwrap_or(0),
        counter: int_field(relic, payload, "counter"),
        damage: int_field(relic, payload, "damage"),
        statuses,
    }
}

fn int_field(relic: &str, payload: &Map<String, Value>, key: &str) -> i64 {
    match payload.get(key) {
        None => 0,
        Some(value) => match value.as_i64().or_else(|| value.as_f64().map(|f| f.round() as i64)) {
            Some(n) => n,
            None => {
                warn!(relic, field = key, "malformed numeric field; defaulting to 0");
                0
            }
        },
    }
}

fn float_field(relic: &str, payload: &Map<String, Value>, key: &str) -> f64 {
    match payload.get(key) {
        None => 0.0,
        Some(value) => value.as_f64().unwrap_or_else(|| {
            warn!(relic, field = key, "malformed numeric field; defaulting to 0");
            0.0
        }),
    }
}
