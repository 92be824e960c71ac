//! Pipeline details
//! Usage: stagechain show <pipeline> [--json]

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::stage::{ConfigStage, Pipeline, Session};

use super::common::open_session;

/// What `show` reports about a pipeline
#[derive(Debug, Serialize)]
pub struct PipelineSummary {
    pub name: String,
    pub stages: Vec<String>,
    pub path: String,
    pub dir: String,
    pub project: String,
    pub data: Option<String>,
    pub stamp: String,
    /// Output filename to its full path
    pub outputs: BTreeMap<String, String>,
}

impl PipelineSummary {
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        let outputs = pipeline
            .output_map()
            .keys()
            .filter_map(|fname| {
                pipeline
                    .output_path(fname)
                    .map(|path| (fname.clone(), path))
            })
            .collect();

        Self {
            name: pipeline.name().to_string(),
            stages: pipeline.stages().to_vec(),
            path: pipeline.stagestack().path().to_string(),
            dir: pipeline.dir(),
            project: pipeline.project().name.clone(),
            data: pipeline.project().data.clone(),
            stamp: pipeline.stamp().to_string(),
            outputs,
        }
    }
}

pub fn summarize(session: &Session, name: &str) -> Result<PipelineSummary> {
    let pipeline = session
        .pipeline(name)
        .with_context(|| format!("Unknown pipeline '{name}'"))?;
    Ok(PipelineSummary::from_pipeline(pipeline))
}

pub fn render(summary: &PipelineSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} {}\n", "Pipeline".bold(), summary.name.cyan().bold()));
    output.push_str(&format!("  Chain:   {}\n", summary.path));
    match &summary.data {
        Some(data) => output.push_str(&format!("  Project: {} ({data})\n", summary.project)),
        None => output.push_str(&format!("  Project: {}\n", summary.project)),
    }
    output.push_str(&format!("  Dir:     {}\n", summary.dir));
    output.push_str(&format!("  Stamp:   {}\n", summary.stamp));

    if summary.outputs.is_empty() {
        output.push_str(&format!("\n{}\n", "(no outputs)".dimmed()));
        return output;
    }

    output.push_str(&format!("\n{}\n", "Outputs".bold()));
    let width = summary.outputs.keys().map(String::len).max().unwrap_or(0);
    for (fname, path) in &summary.outputs {
        output.push_str(&format!("  {fname:width$}  → {path}\n"));
    }

    output
}

pub fn execute(config: Option<&Path>, name: &str, json: bool) -> Result<()> {
    let session = open_session(config)?;
    let summary = summarize(&session, name)?;

    if json {
        let content =
            serde_json::to_string_pretty(&summary).context("Failed to serialize pipeline")?;
        println!("{content}");
    } else {
        print!("{}", render(&summary));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{Project, Stage};

    fn make_session() -> Session {
        let mut session = Session::new();
        session
            .add_project(Project::new("toy").unwrap().with_data("toy.csv"))
            .unwrap();
        session
            .add_stage(Stage::new("import", ["reads.fastq"]).unwrap())
            .unwrap();
        session
            .add_stage(Stage::new("trim", ["reads.fastq", "log.txt"]).unwrap())
            .unwrap();
        session
            .add_pipeline("qc", vec!["toy".into(), "import".into(), "trim".into()])
            .unwrap();
        session
    }

    #[test]
    fn test_summary_fields() {
        let session = make_session();
        let summary = summarize(&session, "qc").unwrap();
        assert_eq!(summary.path, "toy.import.trim");
        assert_eq!(summary.dir, "qc");
        assert_eq!(summary.project, "toy");
        assert_eq!(summary.data.as_deref(), Some("toy.csv"));
        assert_eq!(summary.stamp, "qc/all_targets.stamp");
        assert_eq!(summary.outputs["reads.fastq"], "toy.import.trim/reads.fastq");
    }

    #[test]
    fn test_unknown_pipeline() {
        let session = make_session();
        let err = summarize(&session, "nope").unwrap_err().to_string();
        assert!(err.contains("Unknown pipeline 'nope'"));
    }

    #[test]
    fn test_render_lists_outputs() {
        let session = make_session();
        let rendered = render(&summarize(&session, "qc").unwrap());
        assert!(rendered.contains("toy.import.trim/log.txt"));
        assert!(rendered.contains("qc/all_targets.stamp"));
    }

    #[test]
    fn test_json_shape() {
        let session = make_session();
        let value = serde_json::to_value(summarize(&session, "qc").unwrap()).unwrap();
        assert_eq!(value["project"], "toy");
        assert_eq!(value["stages"][2], "trim");
    }
}
