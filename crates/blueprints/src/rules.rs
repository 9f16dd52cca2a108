//! Rule-system vocabulary carried by assets and fragments as plain data.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AbilityRankType {
    #[default]
    Default,
    DamageDice,
    DamageBonus,
    DamageDiceAlternative,
    DamageBonusAlternative,
    DurationBonus,
    SpeedBonus,
    StatBonus,
    ProjectilesCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AbilitySharedValue {
    #[default]
    Damage,
    Duration,
    StatBonus,
    Heal,
    DamageBonus,
    DurationSecond,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DurationRate {
    #[default]
    Rounds,
    Minutes,
    TenMinutes,
    Hours,
    Days,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum DiceType {
    #[default]
    Zero,
    One,
    D2,
    D3,
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SavingThrowType {
    #[default]
    Unknown,
    Fortitude,
    Reflex,
    Will,
}

/// Action economy slot an ability or requirement consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CommandType {
    Free,
    Move,
    #[default]
    Standard,
    Swift,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AbilityType {
    #[default]
    Simple,
    Spell,
    SpellLike,
    Supernatural,
    Extraordinary,
    Special,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AbilityRange {
    #[default]
    Personal,
    Touch,
    Close,
    Medium,
    Long,
    Unlimited,
    Weapon,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeatureGroup {
    Feat,
    CombatFeat,
    MythicFeat,
    MythicAbility,
    WizardFeat,
    RogueTalent,
    KineticWildTalent,
    Racial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum CompareType {
    Less,
    LessOrEqual,
    #[default]
    Equal,
    GreaterOrEqual,
    Greater,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum PrerequisiteGroup {
    #[default]
    All,
    Any,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    #[default]
    And,
    Or,
}
