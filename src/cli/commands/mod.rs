//! CLI command implementations.
//!
//! Each subcommand has its own module with an Args struct and a `run()`
//! function. Handlers print to stdout; diagnostics go through tracing to
//! stderr.

use crate::cli::Commands;
use crate::error::Result;
use crate::service::SearchService;

pub mod add_job;
pub mod add_skill;
pub mod backfill;
pub mod health;
pub mod search;
pub mod semantic;
pub mod skills;

/// Dispatch a command to its handler
pub fn run(service: &SearchService, machine: bool, command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => search::run(service, machine, args),
        Commands::Semantic(args) => semantic::run(service, machine, args),
        Commands::Skills(args) => skills::run(service, machine, args),
        Commands::Backfill(args) => backfill::run(service, machine, args),
        Commands::Health(args) => health::run(service, machine, args),
        Commands::AddJob(args) => add_job::run(service, machine, args),
        Commands::AddSkill(args) => add_skill::run(service, machine, args),
    }
}
