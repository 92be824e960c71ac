//! Configuration loading
//!
//! This module handles:
//! - Parsing YAML documents into a validated schema
//! - Layering user and project documents
//! - Building a `Session` with pipelines registered in reference order

pub mod discovery;
pub mod loader;
pub mod ordering;
pub mod schema;

pub use discovery::{discover, find_project_config, user_config_path, CONFIG_ENV, CONFIG_FILE_NAME};
pub use loader::{build_session, load_config_file, load_session, merge_configs, parse_config_content};
pub use ordering::build_order;
pub use schema::{
    validate, ParamDefinition, PipelineDefinition, ProjectDefinition, StageDefinition,
    StagechainConfig, StagechainMetadata, ValidationError, SCHEMA_VERSION,
};
