//! Chain resolution
//! Usage: stagechain resolve <chain> [--json]

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::stage::{Entry, ResolvedSegment, Session};

use super::common::open_session;

#[derive(Debug, Serialize)]
pub struct SegmentSummary {
    pub segment: String,
    pub path: String,
    pub kind: &'static str,
    pub name: String,
    pub params: BTreeMap<String, String>,
    pub outputs: Vec<String>,
}

impl SegmentSummary {
    fn from_resolved(resolved: &ResolvedSegment) -> Self {
        let params = match &resolved.entry {
            Entry::Stage(m) => m.params.clone(),
            _ => BTreeMap::new(),
        };
        let outputs = resolved
            .stage()
            .map(|stage| stage.outputs().into_iter().map(String::from).collect())
            .unwrap_or_default();

        Self {
            segment: resolved.segment.clone(),
            path: resolved.path.clone(),
            kind: resolved.entry.kind(),
            name: resolved.entry.name().to_string(),
            params,
            outputs,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResolveSummary {
    pub chain: String,
    pub segments: Vec<SegmentSummary>,
}

pub fn summarize(session: &Session, chain: &str) -> Result<ResolveSummary> {
    let stack = session.stack(chain)?;
    let resolved = stack.resolve(session.registry())?;

    Ok(ResolveSummary {
        chain: stack.path().to_string(),
        segments: resolved.iter().map(SegmentSummary::from_resolved).collect(),
    })
}

fn kind_label(kind: &str) -> String {
    match kind {
        "project" => kind.magenta().to_string(),
        "pipeline" => kind.blue().to_string(),
        _ => kind.green().to_string(),
    }
}

pub fn render(summary: &ResolveSummary) -> String {
    let mut output = format!("{} {}\n", "Chain".bold(), summary.chain.cyan().bold());

    for segment in &summary.segments {
        output.push_str(&format!(
            "  {:<10} {}",
            kind_label(segment.kind),
            segment.segment.bold()
        ));
        if segment.name != segment.segment {
            output.push_str(&format!(" ({})", segment.name));
        }
        output.push('\n');

        output.push_str(&format!("             dir: {}\n", segment.path));
        if !segment.params.is_empty() {
            let params: Vec<String> = segment
                .params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            output.push_str(&format!("             params: {}\n", params.join(", ")));
        }
        if !segment.outputs.is_empty() {
            output.push_str(&format!(
                "             outputs: {}\n",
                segment.outputs.join(", ")
            ));
        }
    }

    output
}

pub fn execute(config: Option<&Path>, chain: &str, json: bool) -> Result<()> {
    let session = open_session(config)?;
    let summary = summarize(&session, chain)?;

    if json {
        let content =
            serde_json::to_string_pretty(&summary).context("Failed to serialize resolution")?;
        println!("{content}");
    } else {
        print!("{}", render(&summary));
    }
    Ok(())
}
