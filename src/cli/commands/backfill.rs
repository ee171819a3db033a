//! jsearch backfill - embed jobs missing a title vector

use clap::Args;

use crate::error::Result;
use crate::service::SearchService;

#[derive(Args, Debug)]
pub struct BackfillArgs {}

pub fn run(service: &SearchService, machine: bool, _args: &BackfillArgs) -> Result<()> {
    let report = service.backfill()?;

    if machine {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    println!(
        "Backfill: {} scanned, {} enriched, {} failed",
        report.scanned, report.enriched, report.failed
    );
    Ok(())
}
