//! Property tests for combining per-image descriptors.

use proptest::prelude::*;

use tbdeploy::domain::entities::{PackageIndex, PackageRecord, PlaylistRecord};

/// One single-package index per language, each with `items` messages.
fn image(language: &str, items: &[String]) -> PackageIndex {
    let mut index = PackageIndex::new("TEST-24-1");
    let prompts_dir = format!("content/prompts/{language}");
    let prompts = index.intern_path(&prompts_dir);
    let announcement = index.audio_ref(&format!("{prompts_dir}/7.mp3"), None);
    let short_prompt = index.audio_ref(&format!("{prompts_dir}/2-0.mp3"), None);
    let long_prompt = index.audio_ref(&format!("{prompts_dir}/i2-0.mp3"), None);
    let messages = items
        .iter()
        .map(|id| index.audio_ref(&format!("content/messages/{id}.mp3"), Some(id)))
        .collect();
    index
        .add_package(PackageRecord {
            name: format!("TEST-24-1-{language}"),
            announcement,
            prompt_paths: vec![prompts],
            playlists: vec![PlaylistRecord {
                name: "2-0".to_string(),
                short_prompt,
                long_prompt,
                messages,
            }],
        })
        .unwrap();
    index
}

fn resolved(index: &PackageIndex) -> Vec<String> {
    index
        .packages()
        .iter()
        .flat_map(|p| p.playlists.iter())
        .flat_map(|pl| pl.messages.iter())
        .map(|m| index.resolve(m).unwrap())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Combining keeps every package and every message's full path,
    /// and shared directories appear once.
    #[test]
    fn property_combine_preserves_resolved_paths(
        languages in proptest::sample::subsequence(vec!["en", "fr", "dga", "sw"], 1..=4),
        items in proptest::collection::vec("[a-z][a-z0-9]{0,5}", 0..6),
    ) {
        let parts: Vec<PackageIndex> = languages.iter().map(|l| image(l, &items)).collect();

        let combined = PackageIndex::combine("TEST-24-1", &parts).unwrap();

        prop_assert_eq!(combined.packages().len(), parts.len());
        let expected: Vec<String> = parts.iter().flat_map(resolved).collect();
        prop_assert_eq!(resolved(&combined), expected);

        let mut unique = combined.paths().to_vec();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), combined.paths().len());
    }
}
