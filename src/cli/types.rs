use clap::{ArgAction, Parser, Subcommand};
use stagechain::commands::list::ListKind;
use stagechain::validation::{clap_chain_validator, clap_name_validator};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "
  ┌─┐┌┬┐┌─┐┌─┐┌─┐┌─┐┬ ┬┌─┐┬┌┐┌
  └─┐ │ ├─┤│ ┬├┤ │  ├─┤├─┤││││
  └─┘ ┴ ┴ ┴└─┘└─┘└─┘┴ ┴┴ ┴┴┘└┘

{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}";

#[derive(Parser)]
#[command(name = "stagechain")]
#[command(about = "Resolve stage chains and pipelines from YAML configuration", long_about = None)]
#[command(version)]
#[command(help_template = HELP_TEMPLATE)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Configuration file (skips discovery of user and project files)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate the configuration, building every pipeline
    Check,

    /// Show a pipeline: chain, project, outputs and stamp
    Show {
        /// Pipeline name (alphanumeric, dash, underscore only; max 128 characters)
        #[arg(value_parser = clap_name_validator)]
        pipeline: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resolve a dotted chain against the configuration
    Resolve {
        /// Chain key, e.g. toy.import.trim_bbmapQ10
        #[arg(value_parser = clap_chain_validator)]
        chain: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List configured definitions
    List {
        /// What to list (stages, projects, pipelines); all when omitted
        #[arg(value_name = "KIND")]
        kind: Option<ListKind>,
    },
}
