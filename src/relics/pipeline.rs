//! Relic pipeline: the owned relics, in persisted display order.
//!
//! The pipeline never mutates combat state. Firing a trigger returns one
//! [`RelicActivation`] per matching relic, in relic order, and the caller
//! applies each one's changes in that order. Passive stats and ether modifiers are cached and
//! recomputed whenever the owned set or its order changes.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ether::EtherModifier;

use super::catalog::RelicCatalog;
use super::condition::{ConditionContext, ConditionEvaluator};
use super::definition::{PassiveStats, RelicChanges, RelicEffect, RelicId, RelicTrigger};

/// One relic's response to a trigger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelicActivation {
    pub relic: RelicId,
    pub trigger: RelicTrigger,
    pub changes: RelicChanges,
    /// The condition failed and the alternate effect was used.
    pub fallback: bool,
}

/// Ordered, duplicate-free list of owned relics.
///
/// ## Example
///
/// ```
/// use ether_combat::relics::{RelicCatalog, RelicDefinition, RelicId, RelicPipeline, PassiveStats};
///
/// let mut catalog = RelicCatalog::new();
/// let stats = PassiveStats { max_energy: 1, ..PassiveStats::default() };
/// catalog.register(RelicDefinition::passive("battery", "Battery", stats)).unwrap();
///
/// let pipeline = RelicPipeline::new(&catalog, [RelicId::new("battery"), RelicId::new("battery")]);
/// assert_eq!(pipeline.len(), 1);
/// assert_eq!(pipeline.passive().max_energy, 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RelicPipeline {
    order: Vector<RelicId>,
    passive: PassiveStats,
    modifiers: Vector<EtherModifier>,
}

impl RelicPipeline {
    /// Build from a persisted id list. Later duplicates are dropped.
    pub fn new(catalog: &RelicCatalog, ids: impl IntoIterator<Item = RelicId>) -> Self {
        let mut order = Vector::new();
        for id in ids {
            if !order.contains(&id) {
                order.push_back(id);
            }
        }
        let mut pipeline = Self {
            order,
            ..Self::default()
        };
        pipeline.recompute(catalog);
        pipeline
    }

    /// Owned relic ids in display order.
    pub fn order(&self) -> impl Iterator<Item = &RelicId> {
        self.order.iter()
    }

    #[must_use]
    pub fn contains(&self, id: &RelicId) -> bool {
        self.order.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Summed passive stats.
    #[must_use]
    pub fn passive(&self) -> &PassiveStats {
        &self.passive
    }

    /// Ether modifiers of owned passive relics, in relic order.
    #[must_use]
    pub fn ether_modifiers(&self) -> Vec<EtherModifier> {
        self.modifiers.iter().copied().collect()
    }

    /// Add a relic at the end. Returns false if already owned.
    pub fn equip(&mut self, catalog: &RelicCatalog, id: RelicId) -> bool {
        if self.order.contains(&id) {
            return false;
        }
        self.order.push_back(id);
        self.recompute(catalog);
        true
    }

    /// Remove a relic. Returns false if not owned.
    pub fn unequip(&mut self, catalog: &RelicCatalog, id: &RelicId) -> bool {
        let Some(index) = self.order.index_of(id) else {
            return false;
        };
        self.order.remove(index);
        self.recompute(catalog);
        true
    }

    /// Replace the display order. The new order must be a permutation of
    /// the owned ids; anything else is refused.
    pub fn reorder(&mut self, catalog: &RelicCatalog, order: Vec<RelicId>) -> bool {
        let mut current: Vec<&RelicId> = self.order.iter().collect();
        let mut proposed: Vec<&RelicId> = order.iter().collect();
        current.sort();
        proposed.sort();
        if current != proposed {
            return false;
        }
        self.order = order.into_iter().collect();
        self.recompute(catalog);
        true
    }

    fn recompute(&mut self, catalog: &RelicCatalog) {
        let mut passive = PassiveStats::default();
        let mut modifiers = Vector::new();
        for id in &self.order {
            match catalog.get(id) {
                Some(relic) => {
                    if let RelicEffect::Passive { stats, ether } = &relic.effect {
                        passive.merge(stats);
                        if let Some(modifier) = ether {
                            modifiers.push_back(*modifier);
                        }
                    }
                }
                None => warn!(relic = %id, "unknown relic id has no effect"),
            }
        }
        self.passive = passive;
        self.modifiers = modifiers;
    }

    /// Collect the responses of every owned relic listening for `trigger`.
    ///
    /// Unknown ids are skipped. A relic whose condition fails contributes
    /// its fallback, or nothing.
    pub fn fire(
        &self,
        catalog: &RelicCatalog,
        trigger: RelicTrigger,
        ctx: &ConditionContext,
    ) -> Vec<RelicActivation> {
        if trigger == RelicTrigger::Passive {
            return Vec::new();
        }

        let mut activations = Vec::new();
        for id in &self.order {
            let Some(relic) = catalog.get(id) else {
                continue;
            };
            let RelicEffect::Triggered { trigger: listens, effect } = &relic.effect else {
                continue;
            };
            if *listens != trigger {
                continue;
            }

            let (changes, fallback) = if ConditionEvaluator::evaluate(&effect.condition, ctx) {
                (effect.changes.clone(), false)
            } else if let Some(alternate) = &effect.fallback {
                (alternate.clone(), true)
            } else {
                continue;
            };

            debug!(relic = %id, %trigger, fallback, "relic activated");
            activations.push(RelicActivation {
                relic: id.clone(),
                trigger,
                changes,
                fallback,
            });
        }
        activations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relics::{RelicCondition, RelicDefinition};

    fn catalog() -> RelicCatalog {
        let mut catalog = RelicCatalog::new();
        catalog
            .register(RelicDefinition::triggered(
                "flask",
                "Flask",
                RelicTrigger::OnTurnStart,
                RelicChanges::new().with_heal(2),
            ))
            .unwrap();
        catalog
            .register(
                RelicDefinition::triggered(
                    "bandage",
                    "Bandage",
                    RelicTrigger::OnTurnStart,
                    RelicChanges::new().with_heal(5),
                )
                .with_condition(RelicCondition::IsDamaged, Some(RelicChanges::new().with_block(1))),
            )
            .unwrap();
        catalog
            .register(RelicDefinition::ether("gem", "Gem", EtherModifier::PerCard { bonus: 2.0 }))
            .unwrap();
        catalog
            .register(RelicDefinition::ether("lens", "Lens", EtherModifier::Factor { factor: 1.5 }))
            .unwrap();
        catalog
    }

    fn ids(names: &[&str]) -> Vec<RelicId> {
        names.iter().map(|n| RelicId::new(*n)).collect()
    }

    #[test]
    fn test_fire_in_order_with_fallback() {
        let catalog = catalog();
        let pipeline = RelicPipeline::new(&catalog, ids(&["bandage", "flask"]));
        let full_hp = ConditionContext::new(1, 10, 10);

        let activations = pipeline.fire(&catalog, RelicTrigger::OnTurnStart, &full_hp);

        assert_eq!(activations.len(), 2);
        assert_eq!(activations[0].relic, RelicId::new("bandage"));
        assert!(activations[0].fallback);
        assert_eq!(activations[0].changes.block, 1);
        assert_eq!(activations[1].changes.heal, 2);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let catalog = catalog();
        let pipeline = RelicPipeline::new(&catalog, ids(&["ghost", "flask"]));

        let activations = pipeline.fire(&catalog, RelicTrigger::OnTurnStart, &ConditionContext::default());
        assert_eq!(activations.len(), 1);
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_modifiers_follow_order() {
        let catalog = catalog();
        let mut pipeline = RelicPipeline::new(&catalog, ids(&["gem", "lens"]));
        assert_eq!(
            pipeline.ether_modifiers(),
            vec![EtherModifier::PerCard { bonus: 2.0 }, EtherModifier::Factor { factor: 1.5 }]
        );

        assert!(pipeline.reorder(&catalog, ids(&["lens", "gem"])));
        assert_eq!(pipeline.ether_modifiers()[0], EtherModifier::Factor { factor: 1.5 });
    }

    #[test]
    fn test_reorder_requires_permutation() {
        let catalog = catalog();
        let mut pipeline = RelicPipeline::new(&catalog, ids(&["gem", "lens"]));

        assert!(!pipeline.reorder(&catalog, ids(&["gem"])));
        assert!(!pipeline.reorder(&catalog, ids(&["gem", "flask"])));
        assert_eq!(pipeline.order().next(), Some(&RelicId::new("gem")));
    }

    #[test]
    fn test_equip_unequip() {
        let catalog = catalog();
        let mut pipeline = RelicPipeline::new(&catalog, Vec::new());

        assert!(pipeline.equip(&catalog, RelicId::new("gem")));
        assert!(!pipeline.equip(&catalog, RelicId::new("gem")));
        assert_eq!(pipeline.ether_modifiers().len(), 1);

        assert!(pipeline.unequip(&catalog, &RelicId::new("gem")));
        assert!(!pipeline.unequip(&catalog, &RelicId::new("gem")));
        assert!(pipeline.ether_modifiers().is_empty());
    }

    #[test]
    fn test_passive_never_fires() {
        let catalog = catalog();
        let pipeline = RelicPipeline::new(&catalog, ids(&["gem"]));
        assert!(pipeline.fire(&catalog, RelicTrigger::Passive, &ConditionContext::default()).is_empty());
    }
}
