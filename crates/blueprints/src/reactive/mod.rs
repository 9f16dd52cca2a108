mod events;
mod party;
mod restore;

pub use events::{
    CombatContext, CombatEventSource, EventBus, PartyCombatHandler, SubscriberKey,
};
pub use party::{Character, InventoryItem, ItemInstance, Party, PartyCharacter, PartyRoster};
pub use restore::{RestoreEndOfCombat, RESTORE_END_OF_COMBAT_KEY};
