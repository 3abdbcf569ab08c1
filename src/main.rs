use chrono::Utc;
use dotenv::dotenv;
use log::{error, info};
use std::io;

use staking_pool_metrics::config::Config;
use staking_pool_metrics::repositories::report_repository;
use staking_pool_metrics::services::pipeline::{self, RunOptions};
use staking_pool_metrics::services::snapshot_gateway::SnapshotGateway;
use staking_pool_metrics::services::snapshot_loader::load_snapshot;
use staking_pool_metrics::services::{database, report_emitter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    info!("Starting staking pool metrics run");
    let config = Config::from_env()?;

    let snapshot = load_snapshot(&config.snapshot_source).await?;
    let gateway = SnapshotGateway::new(snapshot);

    let options = RunOptions {
        parallel_limit: config.parallel_limit,
        metric_set: config.metric_set,
        ss58_prefix: config.ss58_prefix,
    };
    let generated_at = Utc::now();
    let outcome = match pipeline::run(&gateway, &options).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Run aborted: {}", e);
            return Err(e.into());
        }
    };

    for failure in &outcome.enrichment.failures {
        error!("Pool {} excluded from balance totals: {}", failure.pool_id, failure.error);
    }

    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        report_emitter::write_report(&mut out, &outcome.report)?;
        if config.emit_pool_details {
            report_emitter::write_pool_details(&mut out, &outcome.enrichment, config.ss58_prefix)?;
        }
    }

    if let Some(mongo) = &config.mongo {
        let db = database::connect_to_database(&mongo.uri, &mongo.db_name).await?;
        report_repository::save_report(
            &db,
            outcome.current_era,
            config.metric_set,
            &outcome.report,
            generated_at,
        )
        .await?;
    }

    info!("Run complete for era {}", outcome.current_era);
    Ok(())
}
