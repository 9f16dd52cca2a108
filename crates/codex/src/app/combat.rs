use blueprints::reactive::{Character, InventoryItem, ItemInstance, PartyCharacter};
use blueprints::{AssetRegistry, CombatContext, EventBus, Party, RestoreEndOfCombat};
use serde::Serialize;
use tracing::warn;

use super::content::SampleContent;

const COMPANIONS: [&str; 2] = ["Amiri", "Seelah"];
const CHARGES_SPENT_PER_FIGHT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RestoredItem {
    pub(crate) character: String,
    pub(crate) item: String,
    pub(crate) charges_before: u32,
    pub(crate) charges_after: u32,
}

/// Hands the sample wand to two companions, drains it during a fight and
/// lets the end-of-combat listener recharge it.
pub(crate) fn simulate_end_of_combat(
    registry: &AssetRegistry,
    sample: &SampleContent,
) -> Vec<RestoredItem> {
    let wand = match registry.resolve_ref(sample.wand) {
        Ok(wand) => wand,
        Err(err) => {
            warn!(error = %err, "combat_simulation_skipped");
            return Vec::new();
        }
    };

    let mut party = Party::new();
    for name in COMPANIONS {
        party.add(Character::new(name).with_item(ItemInstance::from_blueprint(wand)));
    }

    let mut bus = EventBus::new();
    RestoreEndOfCombat::activate(&mut bus);

    bus.raise_party_combat_state_changed(
        true,
        &mut CombatContext {
            registry,
            party: &mut party,
        },
    );

    for name in COMPANIONS {
        if let Some(character) = party.character_mut(name) {
            for item in character.items_mut() {
                for _ in 0..CHARGES_SPENT_PER_FIGHT {
                    item.spend_charge();
                }
            }
        }
    }
    let before = charges(&party);

    bus.raise_party_combat_state_changed(
        false,
        &mut CombatContext {
            registry,
            party: &mut party,
        },
    );
    RestoreEndOfCombat::deactivate(&mut bus);

    let mut restored = Vec::new();
    for (character, before) in party.characters().iter().zip(before) {
        for (item, charges_before) in character.items().iter().zip(before) {
            restored.push(RestoredItem {
                character: character.name().to_string(),
                item: item.name().to_string(),
                charges_before,
                charges_after: item.charges(),
            });
        }
    }
    restored
}

fn charges(party: &Party) -> Vec<Vec<u32>> {
    party
        .characters()
        .iter()
        .map(|character| character.items().iter().map(ItemInstance::charges).collect())
        .collect()
}
