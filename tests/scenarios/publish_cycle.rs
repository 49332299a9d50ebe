//! Build, publish, publish again.

use std::fs::{self, File};

use tbdeploy::application::{staging_status, StagingStatus};
use tbdeploy::infrastructure::fs::marker_file_names;
use tbdeploy::infrastructure::repositories::{DeploymentProperties, METADATA_FILES};
use tbdeploy::{DeviceGeneration, Revision};

use crate::common::*;

#[test]
fn first_publish_is_revision_a() {
    let env = ProgramEnv::new();
    env.build(DeviceGeneration::V2);

    let result = env.publish();

    assert_eq!(result.revision, Revision::first());
    assert_eq!(result.publish_dir, env.publish_root().join("TEST-24-1-a"));
    assert_eq!(
        result.archive,
        env.publish_root().join("TEST-24-1-a/content-TEST-24-1-a.zip")
    );
    assert!(env.publish_root().join("TEST-24-1-a.rev").is_file());
    assert_eq!(marker_file_names(&env.staging()).unwrap(), ["TEST-24-1-a.rev"]);
    for file in METADATA_FILES {
        assert!(result.publish_dir.join("metadata").join(file).is_file(), "{file}");
    }
    assert!(result
        .publish_dir
        .join("programspec/deployment_info.properties")
        .is_file());

    let props =
        DeploymentProperties::load(&env.staged("programspec/deployment_info.properties")).unwrap();
    assert_eq!(props.get("DEPLOYMENT_REVISION"), Some("a"));
}

#[test]
fn archive_holds_the_deployment_under_content() {
    let env = ProgramEnv::new();
    env.build(DeviceGeneration::V2);

    let result = env.publish();

    let archive = zip::ZipArchive::new(File::open(&result.archive).unwrap()).unwrap();
    let names: Vec<_> = archive.file_names().collect();
    assert!(names.contains(&"content/TEST-24-1/images.v2/packages_data.txt"));
    assert!(names.contains(&"content/TEST-24-1/TEST-24-1-a.rev"));
    assert!(names.contains(&"content/TEST-24-1/shadowFiles/content/messages/id1.mp3"));
    assert!(!names.iter().any(|n| n.contains("UNPUBLISHED_")));
    assert!(result.archived_files > 0);
}

#[test]
fn publish_follows_the_greatest_existing_revision() {
    let env = ProgramEnv::new();
    env.build(DeviceGeneration::V2);
    for name in ["TEST-24-1-a", "TEST-24-1-b", "TEST-24-1-aa", "TEST-24-10-zz"] {
        fs::create_dir_all(env.publish_root().join(name)).unwrap();
    }

    let result = env.publish();

    assert_eq!(result.revision.as_str(), "ab");
    assert_eq!(result.published_name(), "TEST-24-1-ab");
}

#[test]
fn republishing_takes_the_next_revision() {
    let env = ProgramEnv::new();
    env.build(DeviceGeneration::V1);

    let first = env.publish();
    let second = env.publish();

    assert_eq!(first.revision.as_str(), "a");
    assert_eq!(second.revision.as_str(), "b");
    assert!(second.revision > first.revision);
    assert_eq!(marker_file_names(&env.publish_root()).unwrap(), ["TEST-24-1-b.rev"]);
}

#[test]
fn staging_status_tracks_the_cycle() {
    let env = ProgramEnv::new();
    assert_eq!(staging_status(&env.staging()).unwrap(), StagingStatus::Missing);

    env.build(DeviceGeneration::V2);
    match staging_status(&env.staging()).unwrap() {
        StagingStatus::Unpublished { deployment, .. } => assert_eq!(deployment, DEPLOYMENT),
        other => panic!("unexpected status: {other}"),
    }

    env.publish();
    assert_eq!(
        staging_status(&env.staging()).unwrap(),
        StagingStatus::Published {
            deployment: DEPLOYMENT.to_string(),
            revision: Revision::first(),
        }
    );

    env.build(DeviceGeneration::V2);
    assert!(matches!(
        staging_status(&env.staging()).unwrap(),
        StagingStatus::Unpublished { .. }
    ));
}
