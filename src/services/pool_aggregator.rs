use crate::models::{EnrichedPool, MetricValue, PoolId, PoolMember, PoolState};
use crate::services::pool_enrichment::PoolEnrichment;
use crate::utils::fixed_point::{div_floor_one, ratio_1dp, ratio_4dp, zero_ratio_4dp};
use log::debug;
use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};
use std::collections::HashMap;

pub struct PoolInputs<'a> {
    pub enrichment: &'a PoolEnrichment,
    pub members: &'a [PoolMember],
    pub pools_count: u64,
    pub members_count: u64,
    pub total_staked: &'a BigUint,
    /// Zero when the chain exposes no minimum.
    pub min_active_stake: &'a BigUint,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub open: usize,
    pub blocked: usize,
    pub destroying: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSummary {
    pub pools_count: u64,
    pub members_count: u64,
    pub states: StateCounts,
    pub unslashed_count: usize,
    pub avg_member_per_pool: MetricValue,
    pub min_active_stake: BigUint,
    pub members_below_threshold: usize,
    pub staked: BigUint,
    pub points: BigUint,
    pub unbonding: BigUint,
    pub pending_rewards: BigUint,
    pub staking_ratio: String,
    pub missing_ledger_count: usize,
    pub negative_rewards_count: usize,
}

pub fn summarize_pools(inputs: &PoolInputs<'_>) -> PoolSummary {
    let pools = &inputs.enrichment.pools;
    let staked = pools_staked(pools);

    PoolSummary {
        pools_count: inputs.pools_count,
        members_count: inputs.members_count,
        states: state_counts(inputs.enrichment),
        unslashed_count: unslashed_count(pools),
        avg_member_per_pool: avg_member_per_pool(inputs.members_count, inputs.pools_count),
        min_active_stake: inputs.min_active_stake.clone(),
        members_below_threshold: members_below_threshold(
            inputs.members,
            pools,
            inputs.min_active_stake,
        ),
        staking_ratio: staking_ratio(&staked, inputs.total_staked),
        staked,
        points: pools.iter().map(|pool| &pool.pool_points).sum(),
        unbonding: pools.iter().map(|pool| &pool.unbonding_balance).sum(),
        pending_rewards: pending_rewards_total(pools),
        missing_ledger_count: inputs.enrichment.failures.len(),
        negative_rewards_count: pools.iter().filter(|p| p.has_negative_rewards()).count(),
    }
}

/// Counts every bonded pool by state, including pools whose enrichment failed.
pub fn state_counts(enrichment: &PoolEnrichment) -> StateCounts {
    enrichment
        .pools
        .iter()
        .map(|pool| pool.state)
        .chain(enrichment.failures.iter().map(|failure| failure.state))
        .fold(StateCounts::default(), |mut counts, state| {
            match state {
                PoolState::Open => counts.open += 1,
                PoolState::Blocked => counts.blocked += 1,
                PoolState::Destroying => counts.destroying += 1,
            }
            counts
        })
}

/// Pools whose points and balance are still at parity.
pub fn unslashed_count(pools: &[EnrichedPool]) -> usize {
    let hundred = BigUint::from(100u32);
    pools
        .iter()
        .filter(|pool| pool.ratio_percent == hundred)
        .count()
}

pub fn avg_member_per_pool(members_count: u64, pools_count: u64) -> MetricValue {
    match ratio_1dp(members_count, pools_count) {
        Some(avg) => MetricValue::Decimal(avg),
        None => MetricValue::NoData,
    }
}

/// `points * pool_active_balance / max(pool_points, 1)`.
pub fn points_to_balance(points: &BigUint, pool: &EnrichedPool) -> BigUint {
    div_floor_one(&(points * &pool.pool_active_balance), &pool.pool_points)
}

/// Members whose stake, converted from points, is strictly below `threshold`.
/// Members of pools that were not enriched are skipped.
pub fn members_below_threshold(
    members: &[PoolMember],
    pools: &[EnrichedPool],
    threshold: &BigUint,
) -> usize {
    let by_id: HashMap<PoolId, &EnrichedPool> =
        pools.iter().map(|pool| (pool.pool_id, pool)).collect();

    members
        .iter()
        .filter(|member| match by_id.get(&member.pool_id) {
            Some(pool) => points_to_balance(&member.points, pool) < *threshold,
            None => {
                debug!(
                    "Member {} references pool {} outside the enriched set",
                    member.account, member.pool_id
                );
                false
            }
        })
        .count()
}

pub fn pools_staked(pools: &[EnrichedPool]) -> BigUint {
    pools.iter().map(|pool| &pool.pool_active_balance).sum()
}

/// Sum of non-negative pending rewards; negative values are anomalies and are
/// counted separately.
pub fn pending_rewards_total(pools: &[EnrichedPool]) -> BigUint {
    let total: BigInt = pools
        .iter()
        .map(|pool| &pool.pending_rewards)
        .filter(|rewards| !rewards.is_negative())
        .sum();
    total.to_biguint().unwrap_or_else(BigUint::zero)
}

/// `pools_staked / total_staked` with six-digit scaling, four digits shown.
/// Fails closed to zero when nothing is staked.
pub fn staking_ratio(pools_staked: &BigUint, total_staked: &BigUint) -> String {
    ratio_4dp(pools_staked, total_staked).unwrap_or_else(zero_ratio_4dp)
}
