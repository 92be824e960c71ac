//! Pipelines and stacks resolved from a loaded configuration

use std::sync::Arc;

use stagechain::stage::{ConfigStage, StageRef};
use stagechain::StageStack;

use super::helpers::{session_from, METAGENOME_CONFIG};

#[test]
fn test_trimmed_output_map() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);
    let trimmed = session.pipeline("trimmed").unwrap();

    assert_eq!(trimmed.output_map().len(), 2);
    assert_eq!(trimmed.output_map()["reads.fastq"], "proj1.import.trim_bbmap");
    assert_eq!(trimmed.output_map()["log.txt"], "proj1.import.trim_bbmap");
    assert_eq!(trimmed.project().name, "proj1");
    assert_eq!(trimmed.get_path(), "trimmed");
}

#[test]
fn test_nested_pipelines_resolve_project_transitively() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let mapped = session.pipeline("mapped").unwrap();
    assert_eq!(mapped.project().name, "proj1");
    assert_eq!(mapped.project().data.as_deref(), Some("samples.csv"));
    assert_eq!(mapped.stamp(), "mapped/all_targets.stamp");
}

#[test]
fn test_nested_pipeline_outputs_merge_tail_first() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let mapped = session.pipeline("mapped").unwrap();
    let outputs = mapped.outputs();
    for fname in ["mapped.bam", "log.txt", "contigs.fasta", "reads.fastq"] {
        assert!(outputs.contains(fname), "missing {fname}");
    }
    // map_bbmap is closest to the end and owns log.txt
    assert_eq!(mapped.output_map()["log.txt"], "assembled.map_bbmap");
    assert_eq!(mapped.output_map()["contigs.fasta"], "assembled");
    assert_eq!(
        mapped.output_path("mapped.bam").as_deref(),
        Some("assembled.map_bbmap/mapped.bam")
    );
}

#[test]
fn test_pipeline_stack_is_shared_with_direct_lookup() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let trimmed = session.pipeline("trimmed").unwrap();
    let direct = StageStack::get(&session, "proj1.import.trim_bbmap").unwrap();
    assert!(Arc::ptr_eq(trimmed.stagestack(), &direct));
}

#[test]
fn test_find_stage_with_parameter_suffix() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let stack = StageStack::get(&session, "proj1.import.trim_bbmapQ10A").unwrap();
    match stack.find_stage(session.registry(), "trim_bbmapQ10A") {
        Some(StageRef::Stage(m)) => {
            assert_eq!(m.stage.name(), "trim_bbmap");
            assert_eq!(m.params["qual"], "10");
            assert_eq!(m.params["adapters"], "true");
        }
        other => panic!("expected stage match, got {other:?}"),
    }
}

#[test]
fn test_find_stage_project_and_unknown() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let stack = StageStack::get(&session, "proj1").unwrap();
    assert!(stack.find_stage(session.registry(), "proj1").is_none());

    let stack = StageStack::get(&session, "proj1.spades").unwrap();
    assert!(stack.find_stage(session.registry(), "spades").is_none());
}

#[test]
fn test_find_stage_returns_pipeline() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let stack = StageStack::get(&session, "proj1.assembled").unwrap();
    match stack.find_stage(session.registry(), "assembled") {
        Some(StageRef::Pipeline(p)) => assert_eq!(p.name(), "assembled"),
        other => panic!("expected pipeline, got {other:?}"),
    }
}

#[test]
fn test_resolve_unknown_stage_is_error() {
    let (_dir, session) = session_from(METAGENOME_CONFIG);

    let stack = StageStack::get(&session, "proj1.import.spades").unwrap();
    let err = stack.resolve(session.registry()).unwrap_err();
    assert!(err.to_string().contains("Unknown stage 'spades'"));
}

#[test]
fn test_teardown_then_reload_gives_new_stacks() {
    let (_dir, mut session) = session_from(METAGENOME_CONFIG);

    let before = StageStack::get(&session, "toy.import").unwrap();
    session.teardown();
    assert!(session.pipeline("trimmed").is_none());
    assert_eq!(session.stack_count(), 0);

    let after = StageStack::get(&session, "toy.import").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn test_grouped_pipeline_from_config() {
    let config = format!(
        "{}    - name: by_subject\n      stages: [proj1, by_Subject, assemble_megahit, map_bbmap]\n",
        METAGENOME_CONFIG
    );
    let (_dir, session) = session_from(&config);

    let grouped = session.pipeline("by_subject").unwrap();
    assert_eq!(grouped.project().name, "proj1");
    assert_eq!(
        grouped.output_map()["contigs.fasta"],
        "proj1.by_Subject.assemble_megahit"
    );
    assert_eq!(
        grouped.output_map()["log.txt"],
        "proj1.by_Subject.assemble_megahit.map_bbmap"
    );
    assert!(!grouped.outputs().contains("reads.fastq"));
}
