//! jsearch add-skill - add a skill to the vocabulary

use clap::Args;

use crate::error::Result;
use crate::service::SearchService;

#[derive(Args, Debug)]
pub struct AddSkillArgs {
    /// Skill name
    pub name: String,

    /// Display color, e.g. "#3178c6"
    #[arg(long)]
    pub color: Option<String>,
}

pub fn run(service: &SearchService, machine: bool, args: &AddSkillArgs) -> Result<()> {
    let skill = service.add_skill(&args.name, args.color.clone())?;

    if machine {
        println!("{}", serde_json::to_string(&skill)?);
    } else {
        println!("Added skill {}", skill.name);
    }
    Ok(())
}
