//! Second-generation build of TEST-24-1.

use std::fs;

use tbdeploy::domain::entities::PackageIndex;
use tbdeploy::infrastructure::repositories::DeploymentProperties;
use tbdeploy::{DeviceGeneration, TbError};

use crate::common::*;

fn index(env: &ProgramEnv, relative: &str) -> PackageIndex {
    PackageIndex::parse(&fs::read_to_string(env.staged(relative)).unwrap()).unwrap()
}

fn playlist_names(index: &PackageIndex) -> Vec<&str> {
    index.packages()[0]
        .playlists
        .iter()
        .map(|p| p.name.as_str())
        .collect()
}

#[test]
fn v2_build_writes_one_index_per_image() {
    let env = ProgramEnv::new();

    let result = env.build(DeviceGeneration::V2);

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].item, "missing");

    let en = index(&env, "images.v2/TEST-24-1-en/content/packages_data.txt");
    assert_eq!(en.deployment(), "TEST-24-1");
    assert_eq!(en.packages().len(), 1);
    assert_eq!(en.packages()[0].name, "TEST-24-1-en");
    assert_eq!(playlist_names(&en), ["Health", "userfeedback"]);
    assert_eq!(en.packages()[0].prompt_paths, [1]);
    assert!(en.paths()[0].contains("prompts/en"));
    assert_eq!(en.packages()[0].announcement.file_name, "id0.mp3");

    let fr = index(&env, "images.v2/TEST-24-1-fr/content/packages_data.txt");
    assert_eq!(playlist_names(&fr), ["2-0", "tutorial", "userfeedback"]);
    let tutorial = &fr.packages()[0].playlists[1];
    let titles: Vec<_> = tutorial
        .messages
        .iter()
        .map(|m| m.title.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(titles, ["17", "16", "28", "26", "20", "21", "19", "25", "54"]);
    assert_eq!(tutorial.short_prompt.file_name, "$0-1.mp3");
    assert!(fr.packages()[0].playlists[2].messages.is_empty());
    assert_eq!(fr.packages()[0].announcement.file_name, "7.mp3");
}

#[test]
fn v2_build_combines_indexes_for_the_deployment() {
    let env = ProgramEnv::new();

    env.build(DeviceGeneration::V2);

    let combined = index(&env, "images.v2/packages_data.txt");
    let names: Vec<_> = combined.packages().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["TEST-24-1-en", "TEST-24-1-fr"]);
    assert!(combined.paths().len() <= 4);
    for package in combined.packages() {
        for playlist in &package.playlists {
            for message in &playlist.messages {
                assert!(combined.resolve(message).is_some(), "{}", message.file_name);
            }
        }
    }
}

#[test]
fn v2_build_stages_firmware_system_and_audio() {
    let env = ProgramEnv::new();

    env.build(DeviceGeneration::V2);

    assert!(env.staged("firmware.v2/TBookRev2b.hex").is_file());
    assert!(env.staged("firmware.v2/firmware_built.txt").is_file());

    let fr = "images.v2/TEST-24-1-fr";
    assert!(env.staged(&format!("{fr}/system/csm_data.txt")).is_file());
    assert!(env.staged(&format!("{fr}/system/TEST-24-1-fr.pkg")).is_file());
    assert!(env.staged(&format!("{fr}/system/north.grp")).is_file());
    assert!(env.staged(&format!("{fr}/content/prompts/fr/17.mp3")).is_file());
    assert!(env.staged(&format!("{fr}/content/prompts/fr/i9-0.mp3")).is_file());

    assert_eq!(file_len(&env.staged(&format!("{fr}/content/messages/id1.mp3"))), 0);
    assert_eq!(
        fs::read_to_string(env.staged("shadowFiles/content/messages/id1.mp3")).unwrap(),
        "id1.mp3"
    );
    assert_eq!(
        fs::read_to_string(env.staged("communities/village-one/languages/en/10.mp3")).unwrap(),
        "hello"
    );

    let props =
        DeploymentProperties::load(&env.staged("programspec/deployment_info.properties")).unwrap();
    assert_eq!(props.get("ACCEPTABLE_FIRMWARE_VERSIONS"), Some("v2.1.0"));
}

#[test]
fn v2_firmware_falls_back_to_the_installation() {
    let env = ProgramEnv::new();
    let software = env.path("software/firmware.v2");
    fs::create_dir_all(&software).unwrap();
    fs::rename(
        env.path("TB_Options/firmware.v2/TBookRev2b.hex"),
        software.join("TBookRev2b.hex"),
    )
    .unwrap();
    fs::write(software.join("firmware_built.txt"), "v2.0.9").unwrap();

    let err = env
        .try_build_spec("TEST-24-1.toml", DeviceGeneration::V2, true)
        .unwrap_err();
    assert!(matches!(err, TbError::NoFirmware { .. }), "{err}");

    let mut config = env.config();
    config.paths.software = Some(env.path("software"));
    let deployment =
        tbdeploy::infrastructure::repositories::load_deployment_spec(&env.path("TEST-24-1.toml"))
            .unwrap();
    let ctx = tbdeploy::BuildContext::new(
        PROGRAM,
        deployment,
        DeviceGeneration::V2,
        tbdeploy::presentation::factory::build_paths(&config),
    )
    .with_created_at(created_at());
    tbdeploy::presentation::factory::create_build_use_case(&config)
        .unwrap()
        .execute(&ctx)
        .unwrap();

    let props =
        DeploymentProperties::load(&env.staged("programspec/deployment_info.properties")).unwrap();
    assert_eq!(props.get("ACCEPTABLE_FIRMWARE_VERSIONS"), Some("v2.0.9"));
}
