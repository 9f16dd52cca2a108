use blueprints::{Asset, AssetData, AssetKind, AuthoringOutput, ComponentList, Guid};
use serde::Serialize;

use super::combat::RestoredItem;

#[derive(Debug, Serialize)]
pub(crate) struct AuthoringSummary<'a> {
    pub(crate) assets: Vec<AssetSummary<'a>>,
    pub(crate) restored_items: &'a [RestoredItem],
}

#[derive(Debug, Serialize)]
pub(crate) struct AssetSummary<'a> {
    guid: Guid,
    name: &'a str,
    kind: AssetKind,
    display_name: Option<&'a str>,
    description: Option<&'a str>,
    icon: Option<&'a str>,
    components: &'a ComponentList,
    data: &'a AssetData,
}

impl<'a> AuthoringSummary<'a> {
    pub(crate) fn collect(output: &'a AuthoringOutput, restored_items: &'a [RestoredItem]) -> Self {
        let assets = output
            .registry
            .assets()
            .iter()
            .map(|asset| AssetSummary::new(asset, output))
            .collect();
        Self {
            assets,
            restored_items,
        }
    }
}

impl<'a> AssetSummary<'a> {
    fn new(asset: &'a Asset, output: &'a AuthoringOutput) -> Self {
        Self {
            guid: asset.guid(),
            name: asset.name(),
            kind: asset.kind(),
            display_name: output.strings.lookup(asset.display_name().key()),
            description: output.strings.lookup(asset.description().key()),
            icon: asset.icon().map(|icon| icon.filename()),
            components: asset.components(),
            data: asset.data(),
        }
    }
}
