//! Deduplication keeps the tree shape and the bytes a device sees.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tbdeploy::DeviceGeneration;

use crate::common::*;

fn contents(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    tree(dir)
        .into_iter()
        .map(|rel| {
            let bytes = fs::read(dir.join(&rel)).unwrap();
            (rel, bytes)
        })
        .collect()
}

#[test]
fn rebuilding_is_idempotent() {
    let env = ProgramEnv::new();

    let first = env.build(DeviceGeneration::V2);
    let before = contents(&env.deployment_dir());
    let second = env.build(DeviceGeneration::V2);
    let after = contents(&env.deployment_dir());

    assert_eq!(before, after);
    assert_eq!(first.pooled_files, second.pooled_files);
    assert_eq!(first.pool_markers, second.pool_markers);
}

#[test]
fn each_shared_file_is_written_once() {
    let env = ProgramEnv::new();

    let result = env.build(DeviceGeneration::V2);

    let pooled = tree(&env.staged("shadowFiles"));
    assert_eq!(pooled.len(), result.pooled_files);
    assert_eq!(
        pooled.iter().filter(|f| f.ends_with("messages/id1.mp3")).count(),
        1
    );
    assert!(result.pool_markers > result.pooled_files);
}

#[test]
fn dedup_and_plain_builds_have_the_same_images() {
    for generation in [DeviceGeneration::V1, DeviceGeneration::V2] {
        let images = match generation {
            DeviceGeneration::V1 => "images",
            DeviceGeneration::V2 => "images.v2",
        };

        let plain_env = ProgramEnv::new();
        let plain = plain_env.build_spec("TEST-24-1.toml", generation, false);
        let deduped_env = ProgramEnv::new();
        deduped_env.build_spec("TEST-24-1.toml", generation, true);

        assert_eq!(plain.pooled_files, 0);
        assert!(!plain_env.staged("shadowFiles").exists());

        // A failed export still leaves its marker behind when pooling.
        let plain_tree = tree(&plain_env.staged(images));
        let deduped_tree = tree(&deduped_env.staged(images));
        for rel in deduped_tree.iter().filter(|rel| !plain_tree.contains(rel)) {
            assert!(rel.contains("missing"), "{generation}: unexpected {rel}");
            assert_eq!(file_len(&deduped_env.staged(images).join(rel)), 0);
        }

        // Every plain file is either identical in place or a marker whose
        // bytes live in the pool.
        let pool = contents(&deduped_env.staged("shadowFiles"));
        for rel in &plain_tree {
            let plain_bytes = fs::read(plain_env.staged(images).join(rel)).unwrap();
            let deduped_bytes = fs::read(deduped_env.staged(images).join(rel)).unwrap();
            if deduped_bytes == plain_bytes {
                continue;
            }
            assert!(deduped_bytes.is_empty(), "{rel}");
            assert!(pool.values().any(|b| *b == plain_bytes), "{rel} not pooled");
        }
    }
}
