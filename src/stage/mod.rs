//! Stage chain resolution
//!
//! This module handles:
//! - Registering stages, projects and pipelines for a configuration session
//! - Memoizing one canonical `StageStack` per chain key
//! - Building pipelines: output map merge and project root resolution

mod error;
mod params;
mod pipeline;
mod registry;
mod session;
mod stack;
mod types;


pub use error::ConfigError;
pub use params::{ParamKind, ParamMatcher, ParamSpec};
pub use pipeline::{Pipeline, STAMP_FILE};
pub use registry::Registry;
pub use session::Session;
pub use stack::{ResolvedSegment, StageStack};
pub use types::{ConfigStage, Entry, Project, Stage, StageMatch, StageRef};
