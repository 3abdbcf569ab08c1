use crate::error::PipelineError;
use crate::models::{AggregateReport, BondedPool, EraIndex, PoolId};
use crate::services::gateway::{ChainGateway, Constant, ConstantValue, Counter};
use crate::services::metrics_registry::{build_report, registry, MetricInputs, MetricSetVersion};
use crate::services::pool_aggregator::{summarize_pools, PoolInputs};
use crate::services::pool_enrichment::{enrich_pools, EnrichmentContext, PoolEnrichment};
use crate::services::staking_aggregator::{summarize_staking, StakingInputs};
use log::{info, warn};
use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub parallel_limit: usize,
    pub metric_set: MetricSetVersion,
    pub ss58_prefix: u16,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            parallel_limit: 35,
            metric_set: MetricSetVersion::LATEST,
            ss58_prefix: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub current_era: EraIndex,
    pub report: AggregateReport,
    pub enrichment: PoolEnrichment,
}

/// One pass over the gateway's snapshot. Any gateway failure aborts the run
/// without a report.
pub async fn run<G>(gateway: &G, options: &RunOptions) -> Result<RunOutcome, PipelineError>
where
    G: ChainGateway + ?Sized,
{
    let current_era = gateway.get_current_era().await?;
    info!("Aggregating staking state at era {}", current_era);

    let (ledgers, nominators, exposures, total_staked, nominator_count, validator_count) = futures::try_join!(
        gateway.list_ledgers(),
        gateway.list_nominators(),
        gateway.get_era_exposures(current_era),
        gateway.get_era_total_stake(current_era),
        gateway.get_counter(Counter::Nominators),
        gateway.get_counter(Counter::Validators),
    )?;
    info!(
        "Fetched {} ledgers, {} nominators, {} exposures",
        ledgers.len(),
        nominators.len(),
        exposures.len()
    );

    let (bonded_pools, members, pools_count, members_count) = futures::try_join!(
        gateway.list_bonded_pools(),
        gateway.list_pool_members(),
        gateway.get_counter(Counter::BondedPools),
        gateway.get_counter(Counter::PoolMembers),
    )?;
    info!(
        "Fetched {} bonded pools and {} pool members",
        bonded_pools.len(),
        members.len()
    );

    let (existential_deposit, pallet_id, min_active_stake) = futures::try_join!(
        gateway.get_constant(Constant::ExistentialDeposit),
        gateway.get_constant(Constant::PoolsPalletId),
        gateway.get_constant(Constant::MinimumActiveStake),
    )?;
    let ctx = EnrichmentContext {
        existential_deposit: require_balance(Constant::ExistentialDeposit, existential_deposit)?,
        pallet_id: require_integer(Constant::PoolsPalletId, pallet_id)?,
        ss58_prefix: options.ss58_prefix,
    };
    let min_active_stake = min_active_stake
        .map(balance_of)
        .unwrap_or_else(BigUint::zero);

    let pools = distinct_pools(bonded_pools);
    let enrichment = enrich_pools(gateway, &pools, &ctx, options.parallel_limit).await?;

    let staking = summarize_staking(&StakingInputs {
        current_era,
        nominator_count,
        validator_count,
        total_staked: &total_staked,
        ledgers: &ledgers,
        nominators: &nominators,
        exposures: &exposures,
    });
    let pool_summary = summarize_pools(&PoolInputs {
        enrichment: &enrichment,
        members: &members,
        pools_count,
        members_count,
        total_staked: &total_staked,
        min_active_stake: &min_active_stake,
    });

    let report = build_report(
        &registry(),
        options.metric_set,
        &MetricInputs {
            staking: &staking,
            pools: &pool_summary,
        },
    );
    info!(
        "Built metric set v{} with {} entries",
        options.metric_set,
        report.len()
    );

    Ok(RunOutcome {
        current_era,
        report,
        enrichment,
    })
}

/// Keeps the first listing of each pool id so repeated runs see the same set.
fn distinct_pools(listed: Vec<(PoolId, BondedPool)>) -> Vec<BondedPool> {
    let mut seen = HashSet::new();
    listed
        .into_iter()
        .filter_map(|(pool_id, pool)| {
            if seen.insert(pool_id) {
                Some(pool)
            } else {
                warn!("Pool {} is listed more than once, keeping the first entry", pool_id);
                None
            }
        })
        .collect()
}

fn require_balance(
    constant: Constant,
    value: Option<ConstantValue>,
) -> Result<BigUint, PipelineError> {
    value
        .map(balance_of)
        .ok_or(PipelineError::MissingConstant(constant))
}

fn require_integer(constant: Constant, value: Option<ConstantValue>) -> Result<u64, PipelineError> {
    match value.ok_or(PipelineError::MissingConstant(constant))? {
        ConstantValue::Integer(n) => Ok(n),
        ConstantValue::Balance(_) => Err(PipelineError::ConstantType(constant)),
    }
}

fn balance_of(value: ConstantValue) -> BigUint {
    match value {
        ConstantValue::Balance(b) => b,
        ConstantValue::Integer(n) => BigUint::from(n),
    }
}
