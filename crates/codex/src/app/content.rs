use std::time::Duration;

use blueprints::actions::{Condition, GameAction};
use blueprints::fragments::{self, ApplyBuffOptions, TimedBuffOptions, DEFAULT_ACTION_AMOUNT};
use blueprints::rules::{
    AbilityRange, AbilityType, CommandType, CompareType, FeatureGroup, SavingThrowType,
};
use blueprints::{
    to_refs, AbilityTraits, AssetRef, AssetSpec, AuthoringError, AuthoringSession, Component, Guid,
    PrefabLink, BASIC_FEATS_SELECTION,
};
use tracing::info;

/// Guid of the host game's kineticist class.
const KINETICIST_CLASS: &str = "42a455d9ec1ad924d889272429eb8391";
const STANCE_FX: &str = "6dc97e33e73b5ec49bd03b90c5ad6aa6";

pub(crate) struct SampleContent {
    pub(crate) wand: AssetRef,
}

pub(crate) fn author_sample_content(
    session: &mut AuthoringSession,
) -> Result<SampleContent, AuthoringError> {
    register_host_placeholders(session)?;
    let kineticist = AssetRef::CharacterClass(Guid::parse(KINETICIST_CLASS)?);

    let stance_buff = session
        .create_buff(
            AssetSpec::new(
                "ElementalStanceBuff",
                "Elemental Stance",
                "You draw your element close, gaining its protection.",
            )
            .with_icon("ElementalStance.png"),
            Some(PrefabLink {
                asset_id: STANCE_FX.to_string(),
            }),
        )?
        .to_ref();
    let fatigue_buff = session
        .create_buff(
            AssetSpec::new(
                "StanceFatigueBuff",
                "Stance Fatigue",
                "You cannot resume the stance yet.",
            ),
            None,
        )?
        .to_ref();

    let toggle = fragments::conditional(
        Condition::HasBuff(fragments::condition_has_buff(stance_buff)?),
        Some(GameAction::RemoveBuff(fragments::remove_buff(stance_buff, false)?)),
        Some(GameAction::ApplyBuff(fragments::apply_buff(
            stance_buff,
            ApplyBuffOptions {
                permanent: true,
                ..ApplyBuffOptions::default()
            },
        )?)),
        true,
    );
    let fatigue = fragments::conditional_many(
        fragments::condition_has_no_buff(&[fatigue_buff])?,
        [Some(GameAction::ApplyBuff(fragments::apply_buff_timed(
            fatigue_buff,
            TimedBuffOptions {
                duration: 1,
                ..TimedBuffOptions::default()
            },
        )?))],
        [None],
        true,
    );
    let stance_ability = session
        .create_ability(
            AssetSpec::new(
                "ElementalStanceAbility",
                "Elemental Stance",
                "Toggle the stance as a swift action.",
            )
            .with_icon("ElementalStance.png")
            .with_components([
                fragments::run_action(
                    SavingThrowType::Unknown,
                    vec![
                        GameAction::Conditional(Box::new(toggle)),
                        GameAction::Conditional(Box::new(fatigue)),
                    ],
                )?,
                fragments::requirement_action_available(
                    false,
                    CommandType::Swift,
                    DEFAULT_ACTION_AMOUNT,
                ),
                fragments::requirement_has_buff_timed(
                    CompareType::Less,
                    Duration::from_secs(6),
                    &[fatigue_buff],
                )?,
            ]),
            AbilityTraits {
                ability_type: AbilityType::Supernatural,
                action_type: CommandType::Swift,
                range: AbilityRange::Personal,
                duration: "Until dismissed".to_string(),
                ..AbilityTraits::default()
            },
        )?
        .to_ref();

    let stance_feat = session
        .create_feature(
            AssetSpec::new(
                "ElementalStanceFeature",
                "Elemental Stance",
                "Grants the Elemental Stance ability.",
            )
            .with_icon("ElementalStance.png")
            .with_components([fragments::prerequisite_class_level(kineticist, 1, false)?]),
            Some(FeatureGroup::Feat),
        )?
        .to_ref();
    session.attach(stance_feat, [fragments::add_facts(&[stance_ability])?])?;

    let practiced = session
        .create_feature(
            AssetSpec::new(
                "PracticedKineticist",
                "Practiced Kineticist",
                "Counts as four levels higher for prerequisites.",
            )
            .with_components([fragments::class_levels_for_prerequisites(
                KINETICIST_CLASS,
                4,
                None,
                1.0,
            )?]),
            Some(FeatureGroup::Feat),
        )?
        .to_ref();

    let mythic_stance = session
        .copy_asset(stance_feat, "ElementalStanceMythicFeature", None)?
        .to_ref();
    session.attach(mythic_stance, [fragments::add_facts(&[stance_buff])?])?;

    let archetype = session
        .create_archetype(AssetSpec::new(
            "StanceWardenArchetype",
            "Stance Warden",
            "A kineticist who fights from a single stance.",
        ))?
        .to_ref();
    session.add_feature_at_level(archetype, 1, stance_feat)?;
    session.add_feature_at_level(archetype, 1, practiced)?;
    session.remove_feature_at_level(archetype, 3, practiced)?;

    let wand = session
        .create_item(
            AssetSpec::new(
                "WandOfStanceWarden",
                "Wand of the Stance Warden",
                "Refills after every fight.",
            )
            .with_components([Component::RestoreEndOfCombat]),
            3,
        )?
        .to_ref();

    let feats = [stance_feat, practiced, mythic_stance]
        .into_iter()
        .map(|feat| session.registry().resolve_ref(feat))
        .collect::<Result<Vec<_>, _>>()?;
    let feats = to_refs(feats);
    let added = session.add_feats(&feats)?;
    info!(added, assets = session.registry().len(), "sample_content_authored");

    Ok(SampleContent { wand })
}

/// Assets owned by the host game that the sample content points at.
fn register_host_placeholders(session: &mut AuthoringSession) -> Result<(), AuthoringError> {
    session.create_feature_selection(
        AssetSpec::new("BasicFeatSelection", "Feats", "")
            .with_guid(BASIC_FEATS_SELECTION.to_string()),
        Some(FeatureGroup::Feat),
        &[],
    )?;
    session.create_character_class(
        AssetSpec::new("KineticistClass", "Kineticist", "").with_guid(KINETICIST_CLASS),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use blueprints::{AssetData, AuthoringConfig, LocalizationPack, NoIcons};

    use super::*;

    #[test]
    fn sample_feats_are_offered_in_basic_selection() {
        let mut session = AuthoringSession::new(
            &AuthoringConfig::default(),
            Box::new(LocalizationPack::new()),
            Box::new(NoIcons),
        )
        .expect("session");
        author_sample_content(&mut session).expect("sample content");

        let selection = session
            .registry()
            .resolve(BASIC_FEATS_SELECTION)
            .expect("selection");
        let AssetData::FeatureSelection(data) = selection.data() else {
            panic!("not a selection");
        };
        let names = data
            .all_features
            .iter()
            .map(|feat| session.registry().resolve_ref(*feat).expect("feat").name())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "ElementalStanceFeature",
                "PracticedKineticist",
                "ElementalStanceMythicFeature"
            ]
        );
    }
}
