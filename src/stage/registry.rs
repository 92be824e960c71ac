//! Name registry for stages, projects and pipelines

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::validation::CHAIN_SEPARATOR;

use super::error::ConfigError;
use super::pipeline::Pipeline;
use super::types::{ConfigStage, Entry, Project, Stage, StageMatch};

/// All declared definitions of one configuration session, by name.
///
/// Names are unique across the three namespaces. Lookups try projects,
/// then pipelines, then stages.
#[derive(Debug, Default)]
pub struct Registry {
    stages: BTreeMap<String, Arc<Stage>>,
    projects: BTreeMap<String, Arc<Project>>,
    pipelines: BTreeMap<String, Arc<Pipeline>>,
    /// Segments in the longest registered name
    max_width: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn existing_kind(&self, name: &str) -> Option<&'static str> {
        if self.projects.contains_key(name) {
            Some("project")
        } else if self.pipelines.contains_key(name) {
            Some("pipeline")
        } else if self.stages.contains_key(name) {
            Some("stage")
        } else {
            None
        }
    }

    fn ensure_free(&self, name: &str) -> Result<(), ConfigError> {
        match self.existing_kind(name) {
            Some(existing) => Err(ConfigError::Duplicate {
                name: name.to_string(),
                existing,
            }),
            None => Ok(()),
        }
    }

    pub fn insert_stage(&mut self, stage: Stage) -> Result<Arc<Stage>, ConfigError> {
        self.ensure_free(stage.name())?;
        let width = stage.name().split(CHAIN_SEPARATOR).count();
        self.max_width = self.max_width.max(width);
        let stage = Arc::new(stage);
        self.stages
            .insert(stage.name().to_string(), Arc::clone(&stage));
        Ok(stage)
    }

    pub fn insert_project(&mut self, project: Project) -> Result<Arc<Project>, ConfigError> {
        self.ensure_free(&project.name)?;
        let project = Arc::new(project);
        self.projects
            .insert(project.name.clone(), Arc::clone(&project));
        Ok(project)
    }

    pub fn insert_pipeline(&mut self, pipeline: Pipeline) -> Result<Arc<Pipeline>, ConfigError> {
        self.ensure_free(pipeline.name())?;
        let pipeline = Arc::new(pipeline);
        self.pipelines
            .insert(pipeline.name().to_string(), Arc::clone(&pipeline));
        Ok(pipeline)
    }

    pub fn stage(&self, name: &str) -> Option<&Arc<Stage>> {
        self.stages.get(name)
    }

    pub fn project(&self, name: &str) -> Option<&Arc<Project>> {
        self.projects.get(name)
    }

    pub fn pipeline(&self, name: &str) -> Option<&Arc<Pipeline>> {
        self.pipelines.get(name)
    }

    pub fn stages(&self) -> impl Iterator<Item = &Arc<Stage>> {
        self.stages.values()
    }

    pub fn projects(&self) -> impl Iterator<Item = &Arc<Project>> {
        self.projects.values()
    }

    pub fn pipelines(&self) -> impl Iterator<Item = &Arc<Pipeline>> {
        self.pipelines.values()
    }

    /// Widest chain window any entry can claim; never below one segment
    pub fn max_width(&self) -> usize {
        self.max_width.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty() && self.projects.is_empty() && self.pipelines.is_empty()
    }

    /// Find the stage claiming `segment`, either by exact name or by name
    /// plus a parameter suffix. The longest claiming stage name wins.
    pub fn match_stage(&self, segment: &str) -> Option<StageMatch> {
        if let Some(stage) = self.stages.get(segment) {
            if let Some(params) = stage.match_segment(segment) {
                return Some(StageMatch {
                    stage: Arc::clone(stage),
                    segment: segment.to_string(),
                    params,
                });
            }
        }

        self.stages
            .values()
            .filter(|stage| segment.starts_with(stage.name()))
            .filter_map(|stage| {
                stage.match_segment(segment).map(|params| StageMatch {
                    stage: Arc::clone(stage),
                    segment: segment.to_string(),
                    params,
                })
            })
            .max_by_key(|m| m.stage.name().len())
    }

    /// Resolve a name to whichever definition claims it.
    ///
    /// Order: project, pipeline, stage.
    pub fn lookup(&self, name: &str) -> Option<Entry> {
        if let Some(project) = self.projects.get(name) {
            return Some(Entry::Project(Arc::clone(project)));
        }
        if let Some(pipeline) = self.pipelines.get(name) {
            return Some(Entry::Pipeline(Arc::clone(pipeline)));
        }
        self.match_stage(name).map(Entry::Stage)
    }

    pub fn clear(&mut self) {
        self.stages.clear();
        self.projects.clear();
        self.pipelines.clear();
        self.max_width = 0;
    }
}
