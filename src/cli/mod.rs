//! Command-line interface definitions and handlers.
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// jsearch - job search and skill ranking over a local store
#[derive(Parser, Debug)]
#[command(name = "jsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable machine-readable JSON output
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/jsearch/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Keyword and filter search over active jobs
    Search(commands::search::SearchArgs),

    /// Semantic search over job titles
    Semantic(commands::semantic::SemanticArgs),

    /// Search the skill vocabulary
    Skills(commands::skills::SkillsArgs),

    /// Embed every job that is missing a title vector
    Backfill(commands::backfill::BackfillArgs),

    /// Check store and embedding provider health
    Health(commands::health::HealthArgs),

    /// Add a job posting to the store
    AddJob(commands::add_job::AddJobArgs),

    /// Add a skill to the vocabulary
    AddSkill(commands::add_skill::AddSkillArgs),
}
