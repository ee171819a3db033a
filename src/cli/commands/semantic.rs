//! jsearch semantic - semantic search over job titles

use clap::Args;

use crate::error::Result;
use crate::service::SearchService;

#[derive(Args, Debug)]
pub struct SemanticArgs {
    /// Free-text query
    pub query: String,
}

pub fn run(service: &SearchService, machine: bool, args: &SemanticArgs) -> Result<()> {
    let results = match service.semantic_search(&args.query) {
        Ok(results) => results,
        Err(err) => {
            if !machine && err.is_provider_error() {
                eprintln!("Semantic search needs the embedding service; see `jsearch health`.");
            }
            return Err(err);
        }
    };

    if machine {
        println!("{}", serde_json::to_string(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No semantically similar jobs.");
        return Ok(());
    }

    for ranked in &results {
        let similarity = ranked.similarity.unwrap_or_default();
        println!("  {similarity:.3}  {}  {}", ranked.job.id, ranked.job.title);
    }
    Ok(())
}
