use std::rc::Rc;

use tracing::{debug, info};

use super::events::{CombatContext, CombatEventSource, PartyCombatHandler, SubscriberKey};
use crate::reference::AssetRef;

pub const RESTORE_END_OF_COMBAT_KEY: SubscriberKey = SubscriberKey("restore_end_of_combat");

/// Recharges every party item whose item asset carries the
/// `RestoreEndOfCombat` component once combat ends.
///
/// Holds no state; activating twice leaves one subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreEndOfCombat;

impl RestoreEndOfCombat {
    pub fn activate(source: &mut dyn CombatEventSource) -> bool {
        source.subscribe(Rc::new(Self))
    }

    pub fn deactivate(source: &mut dyn CombatEventSource) -> bool {
        source.unsubscribe(RESTORE_END_OF_COMBAT_KEY)
    }
}

impl PartyCombatHandler for RestoreEndOfCombat {
    fn key(&self) -> SubscriberKey {
        RESTORE_END_OF_COMBAT_KEY
    }

    fn handle_party_combat_state_changed(&self, in_combat: bool, context: &mut CombatContext<'_>) {
        if in_combat {
            return;
        }

        let registry = context.registry;
        let mut restored = 0usize;
        for character in context.party.characters_mut() {
            let character_name = character.name().to_string();
            for item in character.inventory_mut() {
                let blueprint = item.blueprint();
                let marked = registry
                    .resolve_ref(AssetRef::Item(blueprint))
                    .is_ok_and(|asset| asset.has_restore_end_of_combat());
                if !marked {
                    continue;
                }
                item.restore_charges();
                restored += 1;
                debug!(
                    character = %character_name,
                    item = item.name(),
                    blueprint = %blueprint,
                    "restore_end_of_combat_item"
                );
            }
        }
        info!(restored, "restore_end_of_combat_finished");
    }
}
