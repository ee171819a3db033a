//! jsearch health - store and embedding provider status

use clap::Args;

use crate::error::Result;
use crate::search::JobFilters;
use crate::service::SearchService;

#[derive(Args, Debug)]
pub struct HealthArgs {}

pub fn run(service: &SearchService, machine: bool, _args: &HealthArgs) -> Result<()> {
    let provider_healthy = service.provider_healthy();
    let active_jobs = service.db().count_jobs(&JobFilters::new())?;
    let schema_version = service.db().schema_version();

    if machine {
        let status = serde_json::json!({
            "store": {
                "path": service.config().store.path,
                "schema_version": schema_version,
                "active_jobs": active_jobs,
            },
            "embedding": {
                "base_url": service.config().embedding.base_url,
                "dims": service.provider_dims(),
                "healthy": provider_healthy,
            },
        });
        println!("{}", serde_json::to_string(&status)?);
        return Ok(());
    }

    println!(
        "Store:    {} (schema v{schema_version}, {active_jobs} active jobs)",
        service.config().store.path.display()
    );
    println!(
        "Provider: {} ({}-dim, {})",
        service.config().embedding.base_url,
        service.provider_dims(),
        if provider_healthy { "healthy" } else { "unreachable" }
    );
    Ok(())
}
