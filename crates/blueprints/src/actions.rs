use serde::Serialize;

use crate::context::ContextDurationValue;
use crate::reference::AssetRef;
use crate::rules::Operation;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameAction {
    ApplyBuff(ContextActionApplyBuff),
    RemoveBuff(ContextActionRemoveBuff),
    Conditional(Box<Conditional>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Condition {
    HasBuff(ContextConditionHasBuff),
}

/// Ordered actions; never contains placeholders for absent actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActionList {
    actions: Vec<GameAction>,
}

impl ActionList {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[GameAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl FromIterator<GameAction> for ActionList {
    fn from_iter<T: IntoIterator<Item = GameAction>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

/// Absent entries are dropped, so `[None]` becomes an empty list.
impl FromIterator<Option<GameAction>> for ActionList {
    fn from_iter<T: IntoIterator<Item = Option<GameAction>>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().flatten().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionsChecker {
    pub conditions: Vec<Condition>,
    pub operation: Operation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditional {
    pub conditions_checker: ConditionsChecker,
    pub if_true: ActionList,
    pub if_false: ActionList,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextActionApplyBuff {
    pub buff: AssetRef,
    pub duration_value: ContextDurationValue,
    pub is_from_spell: bool,
    pub is_not_dispelable: bool,
    pub to_caster: bool,
    pub as_child: bool,
    pub permanent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextActionRemoveBuff {
    pub buff: AssetRef,
    pub to_caster: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextConditionHasBuff {
    pub buff: AssetRef,
    pub not: bool,
}
