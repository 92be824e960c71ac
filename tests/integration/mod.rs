//! Integration tests for configuration loading and chain resolution
//!
//! These tests load real YAML files from temporary directories and check
//! the resolved pipelines, stacks and command output end to end.

pub mod commands;
pub mod config_loading;
pub mod helpers;
pub mod pipeline_resolution;
