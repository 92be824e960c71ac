//! Parse configuration documents and build a session from them

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::stage::{Project, Session, Stage};

use super::ordering::build_order;
use super::schema::{validate, StagechainConfig, StagechainMetadata};

/// Parse and validate one YAML document
pub fn parse_config_content(yaml_content: &str) -> Result<StagechainConfig> {
    let metadata: StagechainMetadata =
        serde_yaml::from_str(yaml_content).with_context(|| "Failed to parse configuration YAML")?;

    if let Err(errors) = validate(&metadata.stagechain) {
        let error_messages: Vec<_> = errors.iter().map(|e| e.to_string()).collect();
        bail!("Validation errors:\n  - {}", error_messages.join("\n  - "));
    }

    Ok(metadata.stagechain)
}

/// Read, parse and validate a configuration file
pub fn load_config_file(path: &Path) -> Result<StagechainConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_content(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Layer documents in order; a later entry replaces an earlier one of the
/// same name and kind.
pub fn merge_configs(configs: Vec<StagechainConfig>) -> StagechainConfig {
    fn upsert<T>(entries: &mut Vec<T>, item: T, name: impl Fn(&T) -> &str, kind: &str) {
        match entries.iter().position(|existing| name(existing) == name(&item)) {
            Some(idx) => {
                warn!(kind, name = %name(&item), "configuration entry overridden");
                entries[idx] = item;
            }
            None => entries.push(item),
        }
    }

    let mut merged = StagechainConfig::default();
    for config in configs {
        merged.version = config.version;
        for project in config.projects {
            upsert(&mut merged.projects, project, |p| p.name.as_str(), "project");
        }
        for stage in config.stages {
            upsert(&mut merged.stages, stage, |s| s.name.as_str(), "stage");
        }
        for pipeline in config.pipelines {
            upsert(&mut merged.pipelines, pipeline, |p| p.name.as_str(), "pipeline");
        }
    }
    merged
}

/// Register every definition of `config` in a fresh session.
///
/// Projects and stages go first, then pipelines in reference order so a
/// pipeline rooted in another pipeline finds it registered.
pub fn build_session(config: &StagechainConfig) -> Result<Session> {
    let mut session = Session::new();

    for def in &config.projects {
        let mut project = Project::new(&def.name)?;
        if let Some(data) = &def.data {
            project = project.with_data(data);
        }
        if let Some(description) = &def.description {
            project = project.with_description(description);
        }
        session.add_project(project)?;
    }

    for def in &config.stages {
        let params = def
            .params
            .iter()
            .map(|p| p.to_spec())
            .collect::<Result<Vec<_>, _>>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid parameters for stage '{}'", def.name))?;

        let mut stage = Stage::new(&def.name, def.outputs.iter().cloned())?.with_params(params)?;
        if let Some(description) = &def.description {
            stage = stage.with_description(description)?;
        }
        session.add_stage(stage)?;
    }

    for def in build_order(&config.pipelines)? {
        let pipeline = session
            .add_pipeline(&def.name, def.stages.clone())
            .with_context(|| format!("Failed to build pipeline '{}'", def.name))?;
        debug!(pipeline = %def.name, outputs = pipeline.output_map().len(), "pipeline registered");
    }

    info!(
        projects = config.projects.len(),
        stages = config.stages.len(),
        pipelines = config.pipelines.len(),
        "configuration loaded"
    );

    Ok(session)
}

/// Load, layer and build a session from several files
pub fn load_session<P: AsRef<Path>>(paths: &[P]) -> Result<Session> {
    if paths.is_empty() {
        bail!("No configuration files given");
    }

    let configs = paths
        .iter()
        .map(|p| load_config_file(p.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_configs(configs);
    if let Err(errors) = validate(&merged) {
        let error_messages: Vec<_> = errors.iter().map(|e| e.to_string()).collect();
        bail!(
            "Merged configuration is invalid:\n  - {}",
            error_messages.join("\n  - ")
        );
    }

    build_session(&merged)
}
