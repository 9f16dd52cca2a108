//! Constructors for fragments and actions.
//!
//! Every constructor checks its required arguments and returns the finished
//! value; nothing here touches the registry.

use std::time::Duration;

use thiserror::Error;

use crate::actions::{
    ActionList, Condition, Conditional, ConditionsChecker, ContextActionApplyBuff,
    ContextActionRemoveBuff, ContextConditionHasBuff, GameAction,
};
use crate::components::{
    AbilityEffectRunAction, AbilityRequirementActionAvailable, AbilityRequirementHasBuffTimed,
    AbilityRequirementHasBuffs, AddFacts, ClassLevelsForPrerequisites, Component,
    PrerequisiteClassLevel,
};
use crate::context::ContextDurationValue;
use crate::identity::{Guid, GuidError};
use crate::progression::LevelEntry;
use crate::reference::{AssetRef, RefKind};
use crate::rules::{
    CommandType, CompareType, DurationRate, Operation, PrerequisiteGroup, SavingThrowType,
};

pub const DEFAULT_ACTION_AMOUNT: f32 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("argument '{argument}' must not be empty")]
    Empty { argument: &'static str },
    #[error("argument '{argument}' expects a {expected:?} reference, got {actual:?}")]
    WrongKind {
        argument: &'static str,
        expected: RefKind,
        actual: RefKind,
    },
    #[error("argument '{argument}': {source}")]
    Guid {
        argument: &'static str,
        #[source]
        source: GuidError,
    },
}

/// Checks that `reference` can stand in for `expected`, re-tagging it as such.
pub fn expect_ref(
    reference: AssetRef,
    expected: RefKind,
    argument: &'static str,
) -> Result<AssetRef, FragmentError> {
    reference.widen(expected).ok_or(FragmentError::WrongKind {
        argument,
        expected,
        actual: reference.kind(),
    })
}

fn expect_refs(
    references: &[AssetRef],
    expected: RefKind,
    argument: &'static str,
) -> Result<Vec<AssetRef>, FragmentError> {
    if references.is_empty() {
        return Err(FragmentError::Empty { argument });
    }
    references
        .iter()
        .map(|reference| expect_ref(*reference, expected, argument))
        .collect()
}

fn parse_class_guid(text: &str, argument: &'static str) -> Result<AssetRef, FragmentError> {
    Guid::parse(text)
        .map(AssetRef::CharacterClass)
        .map_err(|source| FragmentError::Guid { argument, source })
}

/// Optional settings for [`apply_buff`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyBuffOptions {
    pub duration: ContextDurationValue,
    pub from_spell: bool,
    pub dispellable: bool,
    pub to_caster: bool,
    pub as_child: bool,
    pub permanent: bool,
}

impl Default for ApplyBuffOptions {
    fn default() -> Self {
        Self {
            duration: ContextDurationValue::fixed(0, DurationRate::Rounds),
            from_spell: false,
            dispellable: true,
            to_caster: false,
            as_child: false,
            permanent: false,
        }
    }
}

/// Optional settings for [`apply_buff_timed`].
///
/// Unlike [`ApplyBuffOptions`], buffs applied this way are not dispellable
/// unless asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedBuffOptions {
    pub duration: i32,
    pub rate: DurationRate,
    pub dispellable: bool,
    pub permanent: bool,
}

impl Default for TimedBuffOptions {
    fn default() -> Self {
        Self {
            duration: 0,
            rate: DurationRate::Rounds,
            dispellable: false,
            permanent: false,
        }
    }
}

pub fn apply_buff(
    buff: AssetRef,
    options: ApplyBuffOptions,
) -> Result<ContextActionApplyBuff, FragmentError> {
    Ok(ContextActionApplyBuff {
        buff: expect_ref(buff, RefKind::Buff, "buff")?,
        duration_value: options.duration,
        is_from_spell: options.from_spell,
        is_not_dispelable: !options.dispellable,
        to_caster: options.to_caster,
        as_child: options.as_child,
        permanent: options.permanent,
    })
}

/// Applies `buff` for a literal number of `rate` units.
pub fn apply_buff_timed(
    buff: AssetRef,
    options: TimedBuffOptions,
) -> Result<ContextActionApplyBuff, FragmentError> {
    apply_buff(
        buff,
        ApplyBuffOptions {
            duration: ContextDurationValue::fixed(options.duration, options.rate),
            from_spell: false,
            dispellable: options.dispellable,
            permanent: options.permanent,
            ..ApplyBuffOptions::default()
        },
    )
}

pub fn remove_buff(buff: AssetRef, to_caster: bool) -> Result<ContextActionRemoveBuff, FragmentError> {
    Ok(ContextActionRemoveBuff {
        buff: expect_ref(buff, RefKind::Buff, "buff")?,
        to_caster,
    })
}

pub fn condition_has_buff(buff: AssetRef) -> Result<ContextConditionHasBuff, FragmentError> {
    Ok(ContextConditionHasBuff {
        buff: expect_ref(buff, RefKind::Buff, "buff")?,
        not: false,
    })
}

/// One negated has-buff condition per buff, in input order.
pub fn condition_has_no_buff(buffs: &[AssetRef]) -> Result<Vec<Condition>, FragmentError> {
    Ok(expect_refs(buffs, RefKind::Buff, "buffs")?
        .into_iter()
        .map(|buff| Condition::HasBuff(ContextConditionHasBuff { buff, not: true }))
        .collect())
}

pub fn action_list(actions: impl IntoIterator<Item = Option<GameAction>>) -> ActionList {
    actions.into_iter().collect()
}

pub fn conditional(
    condition: Condition,
    if_true: Option<GameAction>,
    if_false: Option<GameAction>,
    operation_and: bool,
) -> Conditional {
    conditional_many(vec![condition], [if_true], [if_false], operation_and)
}

pub fn conditional_many(
    conditions: Vec<Condition>,
    if_true: impl IntoIterator<Item = Option<GameAction>>,
    if_false: impl IntoIterator<Item = Option<GameAction>>,
    operation_and: bool,
) -> Conditional {
    Conditional {
        conditions_checker: ConditionsChecker {
            conditions,
            operation: if operation_and {
                Operation::And
            } else {
                Operation::Or
            },
        },
        if_true: action_list(if_true),
        if_false: action_list(if_false),
    }
}

pub fn run_action(
    saving_throw_type: SavingThrowType,
    actions: Vec<GameAction>,
) -> Result<Component, FragmentError> {
    if actions.is_empty() {
        return Err(FragmentError::Empty {
            argument: "actions",
        });
    }
    Ok(Component::AbilityEffectRunAction(AbilityEffectRunAction {
        saving_throw_type,
        actions: actions.into_iter().collect(),
    }))
}

pub fn requirement_action_available(not: bool, action: CommandType, amount: f32) -> Component {
    Component::AbilityRequirementActionAvailable(AbilityRequirementActionAvailable {
        not,
        action,
        amount,
    })
}

pub fn requirement_has_buffs(not: bool, buffs: &[AssetRef]) -> Result<Component, FragmentError> {
    Ok(Component::AbilityRequirementHasBuffs(
        AbilityRequirementHasBuffs {
            not,
            buffs: expect_refs(buffs, RefKind::Buff, "buffs")?,
        },
    ))
}

pub fn requirement_has_buff_timed(
    compare: CompareType,
    time_left: Duration,
    buffs: &[AssetRef],
) -> Result<Component, FragmentError> {
    Ok(Component::AbilityRequirementHasBuffTimed(
        AbilityRequirementHasBuffTimed {
            compare,
            time_left,
            buffs: expect_refs(buffs, RefKind::Buff, "buffs")?,
        },
    ))
}

pub fn add_facts(facts: &[AssetRef]) -> Result<Component, FragmentError> {
    Ok(Component::AddFacts(AddFacts {
        facts: expect_refs(facts, RefKind::UnitFact, "facts")?,
    }))
}

pub fn prerequisite_class_level(
    character_class: AssetRef,
    level: u32,
    any: bool,
) -> Result<Component, FragmentError> {
    Ok(Component::PrerequisiteClassLevel(PrerequisiteClassLevel {
        character_class: expect_ref(character_class, RefKind::CharacterClass, "character_class")?,
        level,
        group: if any {
            PrerequisiteGroup::Any
        } else {
            PrerequisiteGroup::All
        },
    }))
}

/// Takes raw guid text, so classes owned by the host game can be named
/// without being registered here.
pub fn class_levels_for_prerequisites(
    target_class: &str,
    bonus: i32,
    source_class: Option<&str>,
    multiplier: f64,
) -> Result<Component, FragmentError> {
    let fake_class = parse_class_guid(target_class, "target_class")?;
    let actual_class = source_class
        .map(|text| parse_class_guid(text, "source_class"))
        .transpose()?;
    Ok(Component::ClassLevelsForPrerequisites(
        ClassLevelsForPrerequisites {
            fake_class,
            actual_class,
            summand: bonus,
            modifier: multiplier,
        },
    ))
}

pub fn level_entry(level: u32, features: &[AssetRef]) -> Result<LevelEntry, FragmentError> {
    let features = features
        .iter()
        .map(|feature| expect_ref(*feature, RefKind::FeatureBase, "features"))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LevelEntry { level, features })
}
