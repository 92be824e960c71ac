//! Configuration errors raised while resolving stage chains

use thiserror::Error;

/// Errors reported while building stages, stacks and pipelines.
///
/// These are raised during configuration validation, before any execution
/// begins. A chain segment that simply is not a stage is not an error; see
/// [`StageStack::find_stage`](super::StageStack::find_stage).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Stage chain is empty")]
    EmptyChain,

    #[error("Pipeline '{name}' has an empty stage list")]
    EmptyPipeline { name: String },

    #[error("Malformed stage chain '{chain}': empty segment")]
    MalformedChain { chain: String },

    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("Unknown stage '{name}' in chain '{chain}'")]
    UnknownStage { name: String, chain: String },

    #[error("Pipeline must start with project: {chain}")]
    MissingProject { chain: String },

    #[error("Pipeline root cycle detected: {}", .path.join(" -> "))]
    PipelineCycle { path: Vec<String> },

    #[error("Duplicate name '{name}': already registered as {existing}")]
    Duplicate {
        name: String,
        existing: &'static str,
    },

    #[error("Invalid parameters for stage '{stage}': {reason}")]
    InvalidParams { stage: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid_name(kind: &'static str, name: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidName {
            kind,
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}
