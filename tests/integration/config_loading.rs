//! Loading, layering and discovering configuration files

use serial_test::serial;
use std::fs;
use tempfile::TempDir;

use stagechain::config::{discover, load_session, CONFIG_ENV, CONFIG_FILE_NAME};

use super::helpers::{write_config, METAGENOME_CONFIG};

#[test]
fn test_forward_references_are_built_in_order() {
    let (_dir, path) = write_config(METAGENOME_CONFIG);
    let session = load_session(&[path]).unwrap();

    assert_eq!(session.registry().pipelines().count(), 3);
    assert_eq!(session.registry().stages().count(), 4);
}

#[test]
fn test_project_file_overrides_user_file() {
    let user_dir = TempDir::new().unwrap();
    let user_path = user_dir.path().join("user.yml");
    fs::write(
        &user_path,
        r#"
stagechain:
  version: 1
  projects:
    - name: proj1
      data: user.csv
  stages:
    - name: fastqc
      outputs: [report.html]
"#,
    )
    .unwrap();
    let (_dir, project_path) = write_config(METAGENOME_CONFIG);

    let session = load_session(&[user_path, project_path]).unwrap();

    assert_eq!(
        session.project("proj1").unwrap().data.as_deref(),
        Some("samples.csv")
    );
    assert!(session.stage("fastqc").is_some());
}

#[test]
fn test_pipeline_cycle_is_reported_with_path() {
    let (_dir, path) = write_config(
        r#"
stagechain:
  version: 1
  projects:
    - name: toy
  stages:
    - name: import
  pipelines:
    - name: a
      stages: [c, import]
    - name: b
      stages: [a, import]
    - name: c
      stages: [b, import]
"#,
    );

    let err = format!("{:#}", load_session(&[path]).unwrap_err());
    assert!(err.contains("Circular pipeline reference detected: a -> c -> b -> a"));
}

#[test]
fn test_invalid_config_lists_every_error() {
    let (_dir, path) = write_config(
        r#"
stagechain:
  version: 2
  stages:
    - name: import
      outputs: [reads.fastq, reads.fastq]
  pipelines:
    - name: empty
      stages: []
"#,
    );

    let err = format!("{:#}", load_session(&[path]).unwrap_err());
    assert!(err.contains("version"));
    assert!(err.contains("reads.fastq"));
    assert!(err.contains("Pipeline has no stages"));
}

#[test]
fn test_missing_file_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let err = format!(
        "{:#}",
        load_session(&[temp_dir.path().join("absent.yml")]).unwrap_err()
    );
    assert!(err.contains("Failed to read config file"));
}

#[test]
#[serial]
fn test_discover_finds_project_file_from_subdirectory() {
    let (dir, path) = write_config(METAGENOME_CONFIG);
    let nested = dir.path().join("runs").join("proj1");
    fs::create_dir_all(&nested).unwrap();

    std::env::remove_var(CONFIG_ENV);
    let paths = discover(&nested);
    assert_eq!(paths.last(), Some(&path));
    assert!(path.ends_with(CONFIG_FILE_NAME));
}
