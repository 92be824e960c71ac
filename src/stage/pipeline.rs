//! Pipelines: named, pre-configured stage chains

use std::collections::btree_map::Entry as MapEntry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use crate::validation::validate_segment;

use super::error::ConfigError;
use super::registry::Registry;
use super::session::Session;
use super::stack::StageStack;
use super::types::{ConfigStage, Project};

/// Marker file written by the execution engine once every target ran
pub const STAMP_FILE: &str = "all_targets.stamp";

/// A named alias for a configured stage chain.
///
/// Everything is computed in [`Pipeline::new`]: the backing stack, the
/// output map, the project root and the stamp path. A `Pipeline` value is
/// always fully resolved.
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    stages: Vec<String>,
    stagestack: Arc<StageStack>,
    output_map: BTreeMap<String, String>,
    project: Arc<Project>,
    stamp: String,
}

impl Pipeline {
    pub fn new(name: &str, stages: Vec<String>, session: &Session) -> Result<Self, ConfigError> {
        validate_segment(name).map_err(|e| ConfigError::invalid_name("pipeline", name, e))?;

        if stages.is_empty() {
            return Err(ConfigError::EmptyPipeline {
                name: name.to_string(),
            });
        }

        // Validated on an unshared stack so a failed build leaves no memo entry
        let registry = session.registry();
        let chain_key = StageStack::join_key(&stages);
        let candidate = StageStack::new(&chain_key)?;
        let project = resolve_project(name, &candidate, registry)?;
        let output_map = build_output_map(&candidate, registry);
        let stagestack = session.stack(&chain_key)?;
        let stamp = format!("{name}/{STAMP_FILE}");

        debug!(
            pipeline = %name,
            chain = %stagestack.path(),
            project = %project.name,
            outputs = output_map.len(),
            "pipeline resolved"
        );

        Ok(Self {
            name: name.to_string(),
            stages,
            stagestack,
            output_map,
            project,
            stamp,
        })
    }

    /// Stage names as declared
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    pub fn stagestack(&self) -> &Arc<StageStack> {
        &self.stagestack
    }

    /// First element of the chain: a project or another pipeline
    pub fn root(&self) -> &str {
        &self.stagestack.chain()[0]
    }

    /// Output filename to the chain prefix where it becomes available
    pub fn output_map(&self) -> &BTreeMap<String, String> {
        &self.output_map
    }

    pub fn project(&self) -> &Arc<Project> {
        &self.project
    }

    /// Completion marker path for the execution engine
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Full path of an output this pipeline can produce
    pub fn output_path(&self, fname: &str) -> Option<String> {
        self.output_map
            .get(fname)
            .map(|dir| format!("{dir}/{fname}"))
    }
}

impl ConfigStage for Pipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn outputs(&self) -> BTreeSet<&str> {
        self.output_map.keys().map(String::as_str).collect()
    }

    fn get_path(&self) -> String {
        self.name.clone()
    }
}

/// Merge outputs tail-first: the stage closest to the end of the chain
/// owns any filename declared more than once. Segments nothing claims
/// contribute nothing.
fn build_output_map(stagestack: &StageStack, registry: &Registry) -> BTreeMap<String, String> {
    let mut output_map = BTreeMap::new();

    for resolved in stagestack.resolve_known(registry).iter().rev() {
        let Some(stage) = resolved.stage() else {
            continue;
        };

        for fname in stage.outputs() {
            match output_map.entry(fname.to_string()) {
                MapEntry::Vacant(slot) => {
                    slot.insert(resolved.path.clone());
                }
                MapEntry::Occupied(owner) => {
                    debug!(
                        output = %fname,
                        owner = %owner.get(),
                        shadowed = %resolved.path,
                        "output shadowed by later stage"
                    );
                }
            }
        }
    }

    output_map
}

/// Walk root references until a project is reached.
///
/// Visited pipeline names are tracked so a chain that leads back to a
/// pipeline already on the walk (including the one being built) is
/// reported instead of followed.
fn resolve_project(
    name: &str,
    stagestack: &StageStack,
    registry: &Registry,
) -> Result<Arc<Project>, ConfigError> {
    let mut visited = vec![name.to_string()];
    let mut root = stagestack.chain()[0].clone();

    loop {
        if visited.contains(&root) {
            visited.push(root);
            return Err(ConfigError::PipelineCycle { path: visited });
        }

        if let Some(project) = registry.project(&root) {
            return Ok(Arc::clone(project));
        }

        match registry.pipeline(&root) {
            Some(parent) => {
                let next = parent.root().to_string();
                visited.push(root);
                root = next;
            }
            None => {
                return Err(ConfigError::MissingProject {
                    chain: stagestack.path().to_string(),
                })
            }
        }
    }
}
