use serde::Serialize;

use crate::rules::{AbilityRankType, AbilitySharedValue, DiceType, DurationRate};

/// A fragment parameter: either a literal or a formula evaluated in context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum ContextValue {
    Simple(i32),
    Rank(AbilityRankType),
    Shared(AbilitySharedValue),
}

impl ContextValue {
    pub fn simple(value: i32) -> Self {
        Self::Simple(value)
    }

    pub fn rank(rank: AbilityRankType) -> Self {
        Self::Rank(rank)
    }

    pub fn shared(shared: AbilitySharedValue) -> Self {
        Self::Shared(shared)
    }
}

impl Default for ContextValue {
    fn default() -> Self {
        Self::Rank(AbilityRankType::Default)
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        Self::Simple(value)
    }
}

/// `bonus_value + dice_count_value × dice_type`, measured in `rate` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContextDurationValue {
    pub bonus_value: ContextValue,
    pub rate: DurationRate,
    pub dice_type: DiceType,
    pub dice_count_value: ContextValue,
}

impl ContextDurationValue {
    /// Absent values fall back to a default rank bonus and zero dice.
    pub fn new(
        bonus: Option<ContextValue>,
        rate: DurationRate,
        dice_type: DiceType,
        dice_count: Option<ContextValue>,
    ) -> Self {
        Self {
            bonus_value: bonus.unwrap_or_default(),
            rate,
            dice_type,
            dice_count_value: dice_count.unwrap_or(ContextValue::Simple(0)),
        }
    }

    /// A fixed number of `rate` units with no dice.
    pub fn fixed(amount: i32, rate: DurationRate) -> Self {
        Self::new(
            Some(ContextValue::Simple(amount)),
            rate,
            DiceType::Zero,
            None,
        )
    }
}

impl Default for ContextDurationValue {
    fn default() -> Self {
        Self::new(None, DurationRate::Rounds, DiceType::Zero, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_duration_uses_default_rank_and_zero_dice() {
        let duration = ContextDurationValue::default();
        assert_eq!(
            duration.bonus_value,
            ContextValue::Rank(AbilityRankType::Default)
        );
        assert_eq!(duration.rate, DurationRate::Rounds);
        assert_eq!(duration.dice_type, DiceType::Zero);
        assert_eq!(duration.dice_count_value, ContextValue::Simple(0));
    }

    #[test]
    fn fixed_duration_keeps_literal_bonus() {
        let duration = ContextDurationValue::fixed(3, DurationRate::Minutes);
        assert_eq!(duration.bonus_value, ContextValue::Simple(3));
        assert_eq!(duration.rate, DurationRate::Minutes);
    }

    #[test]
    fn explicit_values_are_kept() {
        let duration = ContextDurationValue::new(
            Some(ContextValue::shared(AbilitySharedValue::Duration)),
            DurationRate::Hours,
            DiceType::D4,
            Some(ContextValue::rank(AbilityRankType::DurationBonus)),
        );
        assert_eq!(
            duration.bonus_value,
            ContextValue::Shared(AbilitySharedValue::Duration)
        );
        assert_eq!(duration.dice_type, DiceType::D4);
        assert_eq!(
            duration.dice_count_value,
            ContextValue::Rank(AbilityRankType::DurationBonus)
        );
    }
}
