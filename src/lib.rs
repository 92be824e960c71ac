pub mod commands;
pub mod config;
pub mod logging;
pub mod stage;
pub mod validation;

pub use stage::{ConfigError, Pipeline, Session, StageStack};

