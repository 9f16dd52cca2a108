use crate::asset::Asset;
use crate::identity::Guid;

/// One item in a character's inventory, backed by an item asset.
pub trait InventoryItem {
    fn name(&self) -> &str;

    /// Guid of the item asset this instance was created from.
    fn blueprint(&self) -> Guid;

    fn restore_charges(&mut self);
}

pub trait PartyCharacter {
    fn name(&self) -> &str;

    fn inventory_mut(&mut self) -> Vec<&mut dyn InventoryItem>;
}

pub trait PartyRoster {
    fn characters_mut(&mut self) -> Vec<&mut dyn PartyCharacter>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInstance {
    name: String,
    blueprint: Guid,
    charges: u32,
    max_charges: u32,
}

impl ItemInstance {
    pub fn new(name: impl Into<String>, blueprint: Guid, max_charges: u32) -> Self {
        Self {
            name: name.into(),
            blueprint,
            charges: max_charges,
            max_charges,
        }
    }

    /// A fully charged instance of `asset`. Non-item assets get no charges.
    pub fn from_blueprint(asset: &Asset) -> Self {
        let max_charges = asset.item().map_or(0, |item| item.charges);
        Self::new(asset.name(), asset.guid(), max_charges)
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn max_charges(&self) -> u32 {
        self.max_charges
    }

    /// Returns false when no charge was left to spend.
    pub fn spend_charge(&mut self) -> bool {
        if self.charges == 0 {
            return false;
        }
        self.charges -= 1;
        true
    }
}

impl InventoryItem for ItemInstance {
    fn name(&self) -> &str {
        &self.name
    }

    fn blueprint(&self) -> Guid {
        self.blueprint
    }

    fn restore_charges(&mut self) {
        self.charges = self.max_charges;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Character {
    name: String,
    inventory: Vec<ItemInstance>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inventory: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: ItemInstance) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn items(&self) -> &[ItemInstance] {
        &self.inventory
    }

    pub fn items_mut(&mut self) -> &mut [ItemInstance] {
        &mut self.inventory
    }
}

impl PartyCharacter for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn inventory_mut(&mut self) -> Vec<&mut dyn InventoryItem> {
        self.inventory
            .iter_mut()
            .map(|item| item as &mut dyn InventoryItem)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    characters: Vec<Character>,
}

impl Party {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, character: Character) {
        self.characters.push(character);
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters
            .iter_mut()
            .find(|character| character.name == name)
    }
}

impl PartyRoster for Party {
    fn characters_mut(&mut self) -> Vec<&mut dyn PartyCharacter> {
        self.characters
            .iter_mut()
            .map(|character| character as &mut dyn PartyCharacter)
            .collect()
    }
}
