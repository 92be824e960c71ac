//! Command renderers against a loaded configuration

use stagechain::commands::{check, list, resolve, show};

use super::helpers::{session_from, write_config, METAGENOME_CONFIG};

#[test]
fn test_show_nested_pipeline() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let summary = show::summarize(&session, "mapped").unwrap();
    assert_eq!(summary.path, "assembled.map_bbmap");
    assert_eq!(summary.project, "proj1");
    assert_eq!(summary.outputs["contigs.fasta"], "assembled/contigs.fasta");

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["stamp"], "mapped/all_targets.stamp");
}

#[test]
fn test_resolve_reports_pipeline_segment() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let summary = resolve::summarize(&session, "trimmed.assemble_megahit").unwrap();
    assert_eq!(summary.segments.len(), 2);
    assert_eq!(summary.segments[0].kind, "pipeline");
    assert!(summary.segments[0].outputs.contains(&"log.txt".to_string()));
    assert_eq!(summary.segments[1].path, "trimmed.assemble_megahit");
}

#[test]
fn test_list_and_check_render() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let rendered = list::render(&session, Some(list::ListKind::Pipelines));
    assert!(rendered.contains("proj1.import.trim_bbmap"));

    let summary = check::render_summary(&session);
    assert!(summary.contains("2 projects, 4 stages, 3 pipelines"));
}

#[test]
fn test_check_execute_with_explicit_config() {
    let (_dir, path) = write_config(METAGENOME_CONFIG);
    check::execute(Some(&path)).unwrap();
}
