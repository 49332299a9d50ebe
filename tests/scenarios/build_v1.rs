//! First-generation build of TEST-24-1.

use std::fs;

use tbdeploy::infrastructure::fs::marker_file_names;
use tbdeploy::infrastructure::repositories::{DeploymentProperties, METADATA_FILES};
use tbdeploy::{DeviceGeneration, TbError};

use crate::common::*;

fn read(env: &ProgramEnv, relative: &str) -> String {
    fs::read_to_string(env.staged(relative)).unwrap()
}

#[test]
fn v1_build_stages_convention_layout() {
    let env = ProgramEnv::new();

    let result = env.build(DeviceGeneration::V1);

    assert_eq!(result.packages, ["TEST-24-1-en", "TEST-24-1-fr"]);
    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].package.as_deref(), Some("TEST-24-1-fr"));
    assert_eq!(result.issues[0].item, "missing");

    // Newest firmware only, plus the bootstrap files
    assert!(env.staged("basic/r1221.img").is_file());
    assert!(env.staged("firmware.v1/r1221.img").is_file());
    assert!(!env.staged("basic/r1215.img").exists());
    assert!(env.staged("basic/bootstrap.txt").is_file());

    // Lists
    let en = "images/TEST-24-1-en";
    assert_eq!(read(&env, &format!("{en}/messages/lists/1/2-0.txt")), "id1\nid2\n");
    assert_eq!(read(&env, &format!("{en}/messages/lists/1/_activeLists.txt")), "!2-0\n9-0\n");
    assert_eq!(file_len(&env.staged(&format!("{en}/messages/lists/1/9-0.txt"))), 0);

    let fr = "images/TEST-24-1-fr";
    assert_eq!(read(&env, &format!("{fr}/messages/lists/1/2-0.txt")), "id1\nmissing\n");
    assert_eq!(
        read(&env, &format!("{fr}/messages/lists/1/_activeLists.txt")),
        "!2-0\n9-0\n!$0-1\n"
    );

    // Language files
    assert_eq!(read(&env, &format!("{en}/languages/en/control.txt")), "control-with_intro.txt");
    assert_eq!(read(&env, &format!("{fr}/languages/fr/control.txt")), "control-no_intro.txt");
    assert_eq!(read(&env, &format!("{fr}/languages/fr/$0-1.txt")), "17\n16\n");
    assert_eq!(read(&env, &format!("{en}/languages/en/intro.a18")), "id0.a18");
    assert!(env.staged(&format!("{fr}/languages/fr/cat/i$0-1.a18")).is_file());

    // System directory
    assert!(env.staged(&format!("{fr}/system/TEST-24-1-fr.pkg")).is_file());
    assert!(env.staged(&format!("{fr}/system/north.grp")).is_file());
    assert_eq!(read(&env, &format!("{fr}/system/config.txt")), "config");
    assert_eq!(read(&env, &format!("{fr}/system/profiles.txt")), "TEST-24-1-FR,fr,1,menu\n");
}

#[test]
fn v1_audio_is_pooled_in_shadow_files() {
    let env = ProgramEnv::new();

    env.build(DeviceGeneration::V1);

    for package in ["TEST-24-1-en", "TEST-24-1-fr"] {
        let marker = env.staged(&format!("images/{package}/messages/audio/id1.a18"));
        assert_eq!(file_len(&marker), 0, "{package} should hold a marker");
    }
    assert_eq!(read(&env, "shadowFiles/messages/audio/id1.a18"), "id1.a18");
    assert_eq!(read(&env, "shadowFiles/languages/en/cat/i2-0.a18"), "en/cat/i2-0.a18");
    assert!(!env.staged("shadowFiles/messages/audio/missing.a18").exists());
}

#[test]
fn v1_build_writes_properties_metadata_and_marker() {
    let env = ProgramEnv::new();

    let result = env.build(DeviceGeneration::V1);

    let props =
        DeploymentProperties::load(&env.staged("programspec/deployment_info.properties")).unwrap();
    assert_eq!(props.get("PROGRAM_ID"), Some("TEST"));
    assert_eq!(props.get("DEPLOYMENT_NAME"), Some("TEST-24-1"));
    assert_eq!(props.get("DEPLOYMENT_NUMBER"), Some("1"));
    assert_eq!(props.get("AUDIO_LANGUAGES"), Some("en,fr"));
    assert_eq!(props.get("ACCEPTABLE_FIRMWARE_VERSIONS"), Some("r1215,r1221"));
    assert_eq!(props.get("DEPLOYMENT_CREATION_USER"), Some("tester@example.org"));
    assert_eq!(props.get("fr"), Some("TEST-24-1-fr"));
    assert!(env.staged("programspec/recipients.csv").is_file());

    for file in METADATA_FILES {
        assert!(env.staged(&format!("metadata/TEST-24-1/{file}")).is_file(), "{file}");
    }
    assert!(read(&env, "metadata/TEST-24-1/contentinpackages.csv").contains("id2"));

    assert_eq!(result.marker, "UNPUBLISHED_101530.000Z_TEST-24-1.rev");
    assert_eq!(marker_file_names(&env.staging()).unwrap(), [result.marker.clone()]);
    assert_eq!(marker_file_names(&env.deployment_dir()).unwrap(), [result.marker]);
}

#[test]
fn greetings_follow_recipients_of_the_deployment() {
    let env = ProgramEnv::new();

    env.build(DeviceGeneration::V1);

    assert_eq!(read(&env, "communities/village-one/languages/en/10.a18"), "hello");
    assert!(env.staged("communities/village-one/system/en.grp").is_file());
    assert!(!env.staged("communities/village-two").exists());
}

#[test]
fn hidden_feedback_narrows_firmware_and_menus() {
    let env = ProgramEnv::new();
    env.write("hidden.toml", TEST_24_1_HIDDEN_FEEDBACK);

    env.build_spec("hidden.toml", DeviceGeneration::V1, true);

    let en = "images/TEST-24-1-en";
    assert_eq!(
        read(&env, &format!("{en}/languages/en/control.txt")),
        "control-no_intro_no_fb.txt"
    );
    assert_eq!(read(&env, &format!("{en}/messages/lists/1/_activeLists.txt")), "!2-0\n");
    let props =
        DeploymentProperties::load(&env.staged("programspec/deployment_info.properties")).unwrap();
    assert_eq!(props.get("ACCEPTABLE_FIRMWARE_VERSIONS"), Some("r1221"));
}

#[test]
fn missing_firmware_aborts_the_build() {
    let env = ProgramEnv::new();
    fs::remove_dir_all(env.path("TB_Options/firmware")).unwrap();

    let err = env
        .try_build_spec("TEST-24-1.toml", DeviceGeneration::V1, true)
        .unwrap_err();

    assert!(matches!(err, TbError::NoFirmware { .. }), "{err}");
}

#[test]
fn missing_control_file_aborts_the_build() {
    let env = ProgramEnv::new();
    fs::remove_file(env.path("TB_Options/system_menus/control-with_intro.txt")).unwrap();

    let err = env
        .try_build_spec("TEST-24-1.toml", DeviceGeneration::V1, true)
        .unwrap_err();

    assert!(err.to_string().contains("control-with_intro.txt"), "{err}");
}
