use crate::error::{EnrichmentError, GatewayError};
use crate::models::{BondedPool, EnrichedPool, PoolId, PoolState};
use crate::services::gateway::ChainGateway;
use crate::services::pool_accounts::{bonded_account, reward_account};
use crate::utils::fixed_point::div_floor_one;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info, warn};
use num_bigint::{BigInt, BigUint};

/// Chain constants every pool's enrichment needs.
#[derive(Debug, Clone)]
pub struct EnrichmentContext {
    pub pallet_id: u64,
    pub existential_deposit: BigUint,
    pub ss58_prefix: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub pool_id: PoolId,
    pub state: PoolState,
    pub error: EnrichmentError,
}

/// Enriched pools and per-pool failures, each sorted by pool id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolEnrichment {
    pub pools: Vec<EnrichedPool>,
    pub failures: Vec<EnrichmentFailure>,
}

/// `points * 100 / max(active, 1)`, truncating.
pub fn ratio_percent(pool_points: &BigUint, pool_active_balance: &BigUint) -> BigUint {
    div_floor_one(&(pool_points * 100u32), pool_active_balance)
}

/// Free balance above the existential deposit. Negative when the reward
/// account holds less than the deposit.
pub fn pending_rewards(free_balance: &BigUint, existential_deposit: &BigUint) -> BigInt {
    BigInt::from(free_balance.clone()) - BigInt::from(existential_deposit.clone())
}

pub async fn enrich_pool<G>(
    gateway: &G,
    pool: &BondedPool,
    ctx: &EnrichmentContext,
) -> Result<Result<EnrichedPool, EnrichmentError>, GatewayError>
where
    G: ChainGateway + ?Sized,
{
    let bonded = bonded_account(ctx.pallet_id, pool.pool_id);
    let reward = reward_account(ctx.pallet_id, pool.pool_id);

    let (ledger, free_balance) = futures::try_join!(
        gateway.get_ledger(&bonded),
        gateway.get_free_balance(&reward)
    )?;

    let ledger = match ledger {
        Some(ledger) => ledger,
        None => {
            warn!(
                "Pool {} bonded account {} has no staking ledger",
                pool.pool_id,
                bonded.to_ss58(ctx.ss58_prefix)
            );
            return Ok(Err(EnrichmentError::MissingLedger {
                pool_id: pool.pool_id,
                bonded_account: bonded,
            }));
        }
    };

    let pending = pending_rewards(&free_balance, &ctx.existential_deposit);
    if pending < BigInt::from(0) {
        warn!(
            "Pool {} reward account {} holds {} below the existential deposit {}",
            pool.pool_id,
            reward.to_ss58(ctx.ss58_prefix),
            free_balance,
            ctx.existential_deposit
        );
    }

    let enriched = EnrichedPool {
        pool_id: pool.pool_id,
        state: pool.state,
        members: pool.member_counter,
        bonded_account: bonded,
        reward_account: reward,
        ratio_percent: ratio_percent(&pool.points, &ledger.active),
        unbonding_balance: ledger.unbonding(),
        pool_active_balance: ledger.active,
        pool_points: pool.points.clone(),
        pending_rewards: pending,
    };
    debug!(
        "Enriched pool {}: active {}, points {}, ratio {}%",
        enriched.pool_id,
        enriched.pool_active_balance,
        enriched.pool_points,
        enriched.ratio_percent
    );
    Ok(Ok(enriched))
}

/// Enriches every pool with at most `parallel_limit` in flight. A missing
/// ledger is recorded against its pool; a gateway error aborts the whole set.
pub async fn enrich_pools<G>(
    gateway: &G,
    pools: &[BondedPool],
    ctx: &EnrichmentContext,
    parallel_limit: usize,
) -> Result<PoolEnrichment, GatewayError>
where
    G: ChainGateway + ?Sized,
{
    info!(
        "Enriching {} pools with parallel limit {}",
        pools.len(),
        parallel_limit
    );

    let outcomes: Vec<_> = stream::iter(pools.iter())
        .map(|pool| async move {
            enrich_pool(gateway, pool, ctx)
                .await
                .map(|outcome| (pool.state, outcome))
        })
        .buffer_unordered(parallel_limit.max(1))
        .try_collect()
        .await?;

    let mut enrichment = PoolEnrichment::default();
    for (state, outcome) in outcomes {
        match outcome {
            Ok(pool) => enrichment.pools.push(pool),
            Err(error) => {
                let pool_id = match &error {
                    EnrichmentError::MissingLedger { pool_id, .. } => *pool_id,
                };
                enrichment.failures.push(EnrichmentFailure {
                    pool_id,
                    state,
                    error,
                });
            }
        }
    }
    enrichment.pools.sort_by_key(|pool| pool.pool_id);
    enrichment.failures.sort_by_key(|failure| failure.pool_id);

    info!(
        "Enriched {} pools, {} failed",
        enrichment.pools.len(),
        enrichment.failures.len()
    );
    Ok(enrichment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::snapshot_gateway::SnapshotGateway;
    use crate::services::test_fixtures::{sample_snapshot, POOLS_PALLET};

    fn ctx() -> EnrichmentContext {
        EnrichmentContext {
            pallet_id: POOLS_PALLET,
            existential_deposit: BigUint::from(10u32),
            ss58_prefix: 0,
        }
    }

    #[test]
    fn ratio_percent_double_points() {
        assert_eq!(
            ratio_percent(&BigUint::from(200u32), &BigUint::from(100u32)),
            BigUint::from(200u32)
        );
    }

    #[test]
    fn ratio_percent_empty_pool_is_zero() {
        assert_eq!(
            ratio_percent(&BigUint::from(0u32), &BigUint::from(0u32)),
            BigUint::from(0u32)
        );
    }

    #[test]
    fn ratio_percent_truncates() {
        assert_eq!(
            ratio_percent(&BigUint::from(2u32), &BigUint::from(3u32)),
            BigUint::from(66u32)
        );
    }

    #[test]
    fn pending_rewards_can_go_negative() {
        assert_eq!(
            pending_rewards(&BigUint::from(15u32), &BigUint::from(10u32)),
            BigInt::from(5)
        );
        assert_eq!(
            pending_rewards(&BigUint::from(4u32), &BigUint::from(10u32)),
            BigInt::from(-6)
        );
    }

    #[tokio::test]
    async fn enriches_pool_from_ledger_and_reward_balance() {
        let snapshot = sample_snapshot();
        let pool = snapshot.bonded_pools[0].clone();
        let gateway = SnapshotGateway::new(snapshot);

        let enriched = enrich_pool(&gateway, &pool, &ctx()).await.unwrap().unwrap();
        assert_eq!(enriched.pool_id, 1);
        assert_eq!(enriched.pool_active_balance, BigUint::from(1_000u32));
        assert_eq!(enriched.unbonding_balance, BigUint::from(200u32));
        assert_eq!(enriched.ratio_percent, BigUint::from(100u32));
        assert_eq!(enriched.pending_rewards, BigInt::from(40));
        assert_eq!(enriched.bonded_account, bonded_account(POOLS_PALLET, 1));
    }

    #[tokio::test]
    async fn missing_ledger_is_recorded_not_fatal() {
        let snapshot = sample_snapshot();
        let pools = snapshot.bonded_pools.clone();
        let gateway = SnapshotGateway::new(snapshot);

        let enrichment = enrich_pools(&gateway, &pools, &ctx(), 4).await.unwrap();
        assert_eq!(enrichment.pools.len(), 1);
        assert_eq!(enrichment.failures.len(), 1);
        assert_eq!(enrichment.failures[0].pool_id, 2);
        assert_eq!(
            enrichment.failures[0].error,
            EnrichmentError::MissingLedger {
                pool_id: 2,
                bonded_account: bonded_account(POOLS_PALLET, 2),
            }
        );
    }

    #[tokio::test]
    async fn results_are_sorted_regardless_of_completion_order() {
        let mut snapshot = sample_snapshot();
        snapshot.bonded_pools.reverse();
        let pools = snapshot.bonded_pools.clone();
        let gateway = SnapshotGateway::new(snapshot);

        let serial = enrich_pools(&gateway, &pools, &ctx(), 1).await.unwrap();
        let parallel = enrich_pools(&gateway, &pools, &ctx(), 16).await.unwrap();
        assert_eq!(serial, parallel);
    }
}
