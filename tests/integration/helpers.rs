//! Shared test helpers for configuration integration tests

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use stagechain::config::{load_session, CONFIG_FILE_NAME};
use stagechain::Session;

/// A small metagenomics-style configuration used across tests
pub const METAGENOME_CONFIG: &str = r#"
stagechain:
  version: 1
  projects:
    - name: proj1
      data: samples.csv
    - name: toy
  stages:
    - name: import
      description: Import raw reads
      outputs: [reads.fastq]
    - name: trim_bbmap
      outputs: [reads.fastq, log.txt]
      params:
        - { key: Q, name: qual, kind: int, default: 20 }
        - { key: A, name: adapters, kind: flag }
    - name: assemble_megahit
      outputs: [contigs.fasta]
    - name: map_bbmap
      outputs: [mapped.bam, log.txt]
  pipelines:
    - name: mapped
      stages: [assembled, map_bbmap]
    - name: assembled
      stages: [trimmed, assemble_megahit]
    - name: trimmed
      stages: [proj1, import, trim_bbmap]
"#;

/// Test helper: write `content` as `stagechain.yml` in a fresh directory
pub fn write_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, content).expect("Failed to write config file");
    (temp_dir, path)
}

/// Test helper: load a session from a single config document
pub fn session_from(content: &str) -> (TempDir, Session) {
    let (temp_dir, path) = write_config(content);
    let session = load_session(&[path]).expect("Failed to load session");
    (temp_dir, session)
}
