pub mod database;
pub mod gateway;
pub mod metrics_registry;
pub mod pipeline;
pub mod pool_accounts;
pub mod pool_aggregator;
pub mod pool_enrichment;
pub mod report_emitter;
pub mod snapshot_gateway;
pub mod snapshot_loader;
pub mod staking_aggregator;

#[cfg(test)]
pub(crate) mod test_fixtures;
