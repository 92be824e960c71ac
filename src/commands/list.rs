//! List configured definitions
//! Usage: stagechain list [stages|projects|pipelines]

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use std::path::Path;

use crate::stage::{ConfigStage, ParamKind, ParamSpec, Session};

use super::common::open_session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Stages,
    Projects,
    Pipelines,
}

fn format_param(param: &ParamSpec) -> String {
    let shape = match param.kind {
        ParamKind::Int => format!("{}<n>", param.key),
        ParamKind::Flag => param.key.clone(),
        ParamKind::Choice => format!("{}<{}>", param.key, param.values.join("|")),
    };
    match &param.default {
        Some(default) => format!("{}={shape} (default {default})", param.name),
        None => format!("{}={shape}", param.name),
    }
}

fn render_stages(session: &Session, output: &mut String) {
    output.push_str(&format!("{}\n", "Stages".bold()));
    let stages: Vec<_> = session.registry().stages().collect();
    if stages.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for stage in stages {
        let outputs: Vec<&str> = stage.outputs().into_iter().collect();
        output.push_str(&format!("  {}", stage.name().green()));
        if !outputs.is_empty() {
            output.push_str(&format!("  → {}", outputs.join(", ")));
        }
        output.push('\n');
        if let Some(description) = stage.description() {
            output.push_str(&format!("      {}\n", description.dimmed()));
        }
        for param in stage.params() {
            output.push_str(&format!("      {}\n", format_param(param)));
        }
    }
}

fn render_projects(session: &Session, output: &mut String) {
    output.push_str(&format!("{}\n", "Projects".bold()));
    let projects: Vec<_> = session.registry().projects().collect();
    if projects.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for project in projects {
        match &project.data {
            Some(data) => output.push_str(&format!("  {}  ({data})\n", project.name.magenta())),
            None => output.push_str(&format!("  {}\n", project.name.magenta())),
        }
    }
}

fn render_pipelines(session: &Session, output: &mut String) {
    output.push_str(&format!("{}\n", "Pipelines".bold()));
    let pipelines: Vec<_> = session.registry().pipelines().collect();
    if pipelines.is_empty() {
        output.push_str(&format!("  {}\n", "(none)".dimmed()));
    }
    for pipeline in pipelines {
        output.push_str(&format!(
            "  {}  = {}  [{}]\n",
            pipeline.name().blue(),
            pipeline.stagestack().path(),
            pipeline.project().name
        ));
    }
}

/// Render one kind, or every kind when `kind` is `None`
pub fn render(session: &Session, kind: Option<ListKind>) -> String {
    let mut output = String::new();
    match kind {
        Some(ListKind::Stages) => render_stages(session, &mut output),
        Some(ListKind::Projects) => render_projects(session, &mut output),
        Some(ListKind::Pipelines) => render_pipelines(session, &mut output),
        None => {
            render_projects(session, &mut output);
            output.push('\n');
            render_stages(session, &mut output);
            output.push('\n');
            render_pipelines(session, &mut output);
        }
    }
    output
}

pub fn execute(config: Option<&Path>, kind: Option<ListKind>) -> Result<()> {
    let session = open_session(config)?;
    print!("{}", render(&session, kind));
    Ok(())
}
