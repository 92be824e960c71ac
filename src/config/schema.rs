//! Configuration YAML schema definitions and validation

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::stage::{ParamKind, ParamSpec};
use crate::validation::{
    validate_description, validate_filename, validate_segment, validate_stage_name,
};

/// Only supported schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Root structure of a configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagechainMetadata {
    pub stagechain: StagechainConfig,
}

/// Declared projects, stages and pipelines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagechainConfig {
    pub version: u32,
    #[serde(default)]
    pub projects: Vec<ProjectDefinition>,
    #[serde(default)]
    pub stages: Vec<StageDefinition>,
    #[serde(default)]
    pub pipelines: Vec<PipelineDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDefinition {
    pub name: String,
    /// Sample sheet or data source the project reads from
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub params: Vec<ParamDefinition>,
}

/// Parameter declaration; `default` accepts any YAML scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDefinition {
    pub key: String,
    pub name: String,
    pub kind: ParamKind,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
}

impl ParamDefinition {
    pub fn to_spec(&self) -> Result<ParamSpec, String> {
        let default = match &self.default {
            None | Some(serde_yaml::Value::Null) => None,
            Some(serde_yaml::Value::String(s)) => Some(s.clone()),
            Some(serde_yaml::Value::Number(n)) => Some(n.to_string()),
            Some(serde_yaml::Value::Bool(b)) => Some(b.to_string()),
            Some(other) => {
                return Err(format!(
                    "default of parameter '{}' must be a scalar, got {other:?}",
                    self.name
                ))
            }
        };

        Ok(ParamSpec {
            key: self.key.clone(),
            name: self.name.clone(),
            kind: self.kind,
            values: self.values.clone(),
            default,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub name: String,
    pub stages: Vec<String>,
}

/// Validation error with context
#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
    pub name: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "'{}': {}", name, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

fn error(name: Option<&str>, message: impl Into<String>) -> ValidationError {
    ValidationError {
        message: message.into(),
        name: name.map(String::from),
    }
}

fn check_unique<'a>(seen: &mut HashSet<&'a str>, name: &'a str, errors: &mut Vec<ValidationError>) {
    if !seen.insert(name) {
        errors.push(error(Some(name), "Duplicate name"));
    }
}

/// Validate a configuration document, collecting every problem found
pub fn validate(config: &StagechainConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.version != SCHEMA_VERSION {
        errors.push(error(
            None,
            format!(
                "Unsupported version: {}. Only version {SCHEMA_VERSION} is supported.",
                config.version
            ),
        ));
    }

    // Projects, stages and pipelines share one namespace
    let mut seen: HashSet<&str> = HashSet::new();

    for project in &config.projects {
        if let Err(e) = validate_segment(&project.name) {
            errors.push(error(Some(&project.name), format!("Invalid project name: {e}")));
        }
        if let Some(description) = &project.description {
            if let Err(e) = validate_description(description) {
                errors.push(error(Some(&project.name), e.to_string()));
            }
        }
        check_unique(&mut seen, &project.name, &mut errors);
    }

    for stage in &config.stages {
        if let Err(e) = validate_stage_name(&stage.name) {
            errors.push(error(Some(&stage.name), format!("Invalid stage name: {e}")));
        }
        if let Some(description) = &stage.description {
            if let Err(e) = validate_description(description) {
                errors.push(error(Some(&stage.name), e.to_string()));
            }
        }
        check_unique(&mut seen, &stage.name, &mut errors);

        let mut outputs = HashSet::new();
        for output in &stage.outputs {
            if let Err(e) = validate_filename(output) {
                errors.push(error(Some(&stage.name), e.to_string()));
            }
            if !outputs.insert(output.as_str()) {
                errors.push(error(
                    Some(&stage.name),
                    format!("Output '{output}' declared more than once"),
                ));
            }
        }

        let mut param_names = HashSet::new();
        for param in &stage.params {
            if let Err(e) = param.to_spec() {
                errors.push(error(Some(&stage.name), e));
            }
            if !param_names.insert(param.name.as_str()) {
                errors.push(error(
                    Some(&stage.name),
                    format!("Parameter '{}' declared more than once", param.name),
                ));
            }
        }
    }

    for pipeline in &config.pipelines {
        if let Err(e) = validate_segment(&pipeline.name) {
            errors.push(error(Some(&pipeline.name), format!("Invalid pipeline name: {e}")));
        }
        if pipeline.stages.is_empty() {
            errors.push(error(Some(&pipeline.name), "Pipeline has no stages"));
        }
        for element in &pipeline.stages {
            if let Err(e) = validate_stage_name(element) {
                errors.push(error(
                    Some(&pipeline.name),
                    format!("Invalid chain element '{element}': {e}"),
                ));
            }
        }
        check_unique(&mut seen, &pipeline.name, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
