//! Stage, project and lookup result types

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::validation::{validate_description, validate_filename, validate_segment, validate_stage_name};

use super::error::ConfigError;
use super::params::{ParamMatcher, ParamSpec};
use super::pipeline::Pipeline;

/// Common contract of leaf stages and pipelines
pub trait ConfigStage {
    fn name(&self) -> &str;

    /// Filenames this stage can produce
    fn outputs(&self) -> BTreeSet<&str>;

    fn get_path(&self) -> String {
        self.name().to_string()
    }

    fn dir(&self) -> String {
        self.get_path()
    }
}

/// A leaf processing step declared in configuration
#[derive(Debug, Clone)]
pub struct Stage {
    name: String,
    description: Option<String>,
    outputs: BTreeSet<String>,
    matcher: ParamMatcher,
}

impl Stage {
    pub fn new<I, S>(name: &str, outputs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_stage_name(name).map_err(|e| ConfigError::invalid_name("stage", name, e))?;

        let outputs: BTreeSet<String> = outputs.into_iter().map(Into::into).collect();
        for output in &outputs {
            validate_filename(output).map_err(|e| ConfigError::invalid_name("output", output, e))?;
        }

        Ok(Self {
            name: name.to_string(),
            description: None,
            outputs,
            matcher: ParamMatcher::new(name, Vec::new())?,
        })
    }

    pub fn with_description(mut self, description: &str) -> Result<Self, ConfigError> {
        validate_description(description)
            .map_err(|e| ConfigError::invalid_name("stage", &self.name, e))?;
        self.description = Some(description.to_string());
        Ok(self)
    }

    pub fn with_params(mut self, params: Vec<ParamSpec>) -> Result<Self, ConfigError> {
        self.matcher = ParamMatcher::new(&self.name, params)?;
        Ok(self)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn params(&self) -> &[ParamSpec] {
        self.matcher.params()
    }

    pub fn match_segment(&self, segment: &str) -> Option<BTreeMap<String, String>> {
        self.matcher.match_segment(segment)
    }
}

impl ConfigStage for Stage {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> BTreeSet<&str> {
        self.outputs.iter().map(String::as_str).collect()
    }
}

/// Root dataset a chain is anchored to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub data: Option<String>,
    pub description: Option<String>,
}

impl Project {
    pub fn new(name: &str) -> Result<Self, ConfigError> {
        validate_segment(name).map_err(|e| ConfigError::invalid_name("project", name, e))?;
        Ok(Self {
            name: name.to_string(),
            data: None,
            description: None,
        })
    }

    pub fn with_data(mut self, data: &str) -> Self {
        self.data = Some(data.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// A stage that claimed a chain segment, with the parameters it parsed
#[derive(Debug, Clone)]
pub struct StageMatch {
    pub stage: Arc<Stage>,
    pub segment: String,
    pub params: BTreeMap<String, String>,
}

/// Anything that contributes outputs to a chain
#[derive(Debug, Clone)]
pub enum StageRef {
    Stage(StageMatch),
    Pipeline(Arc<Pipeline>),
}

impl StageRef {
    pub fn as_config_stage(&self) -> &dyn ConfigStage {
        match self {
            StageRef::Stage(m) => m.stage.as_ref(),
            StageRef::Pipeline(p) => p.as_ref(),
        }
    }

    pub fn name(&self) -> &str {
        self.as_config_stage().name()
    }

    pub fn outputs(&self) -> BTreeSet<&str> {
        self.as_config_stage().outputs()
    }
}

/// Result of looking a name up in the registry
#[derive(Debug, Clone)]
pub enum Entry {
    Project(Arc<Project>),
    Pipeline(Arc<Pipeline>),
    Stage(StageMatch),
}

impl Entry {
    pub fn kind(&self) -> &'static str {
        match self {
            Entry::Project(_) => "project",
            Entry::Pipeline(_) => "pipeline",
            Entry::Stage(_) => "stage",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Project(p) => &p.name,
            Entry::Pipeline(p) => p.name(),
            Entry::Stage(m) => m.stage.name(),
        }
    }

    /// The stage-like view of this entry; projects are not stages
    pub fn as_stage(&self) -> Option<StageRef> {
        match self {
            Entry::Project(_) => None,
            Entry::Pipeline(p) => Some(StageRef::Pipeline(Arc::clone(p))),
            Entry::Stage(m) => Some(StageRef::Stage(m.clone())),
        }
    }
}
