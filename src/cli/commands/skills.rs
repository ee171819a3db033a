//! jsearch skills - search the skill vocabulary

use clap::Args;

use crate::error::Result;
use crate::service::SearchService;

#[derive(Args, Debug)]
pub struct SkillsArgs {
    /// Skill name or fragment
    pub term: String,
}

pub fn run(service: &SearchService, machine: bool, args: &SkillsArgs) -> Result<()> {
    let skills = service.search_skills(&args.term)?;

    if machine {
        println!("{}", serde_json::to_string(&skills)?);
        return Ok(());
    }

    if skills.is_empty() {
        println!("No matching skills.");
        return Ok(());
    }

    for skill in &skills {
        println!("  {}", skill.name);
    }
    Ok(())
}
