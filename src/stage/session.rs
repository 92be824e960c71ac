//! Configuration session: registries plus the stage stack memo table

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use super::error::ConfigError;
use super::pipeline::Pipeline;
use super::registry::Registry;
use super::stack::StageStack;
use super::types::{Project, Stage};

/// Owner of everything loaded for one configuration lifetime.
///
/// Definitions are added through `&mut self` while loading; afterwards the
/// session is only read and may be shared across threads. Stage stacks are
/// memoized here, so they never outlive the configuration that produced
/// them.
#[derive(Debug, Default)]
pub struct Session {
    registry: Registry,
    stacks: Mutex<HashMap<String, Arc<StageStack>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn add_stage(&mut self, stage: Stage) -> Result<Arc<Stage>, ConfigError> {
        self.registry.insert_stage(stage)
    }

    pub fn add_project(&mut self, project: Project) -> Result<Arc<Project>, ConfigError> {
        self.registry.insert_project(project)
    }

    /// Build a pipeline against the current registry and register it.
    ///
    /// Nothing is registered when construction fails.
    pub fn add_pipeline(
        &mut self,
        name: &str,
        stages: Vec<String>,
    ) -> Result<Arc<Pipeline>, ConfigError> {
        let pipeline = Pipeline::new(name, stages, self)?;
        self.registry.insert_pipeline(pipeline)
    }

    pub fn stage(&self, name: &str) -> Option<&Arc<Stage>> {
        self.registry.stage(name)
    }

    pub fn project(&self, name: &str) -> Option<&Arc<Project>> {
        self.registry.project(name)
    }

    pub fn pipeline(&self, name: &str) -> Option<&Arc<Pipeline>> {
        self.registry.pipeline(name)
    }

    /// The canonical stack for `chain_key`.
    ///
    /// The memo lock is held across check-then-insert so concurrent first
    /// requests for a key still agree on a single instance.
    pub fn stack(&self, chain_key: &str) -> Result<Arc<StageStack>, ConfigError> {
        let mut stacks = self.stacks.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(stack) = stacks.get(chain_key) {
            return Ok(Arc::clone(stack));
        }

        let stack = Arc::new(StageStack::new(chain_key)?);
        debug!(chain = %chain_key, "stage stack created");
        stacks.insert(chain_key.to_string(), Arc::clone(&stack));
        Ok(stack)
    }

    /// Number of memoized stacks
    pub fn stack_count(&self) -> usize {
        self.stacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Discard every definition and memoized stack.
    ///
    /// Stacks requested afterwards are new instances.
    pub fn teardown(&mut self) {
        let stacks = self
            .stacks
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        info!(stacks = stacks.len(), "tearing down configuration session");
        stacks.clear();
        self.registry.clear();
    }
}
