//! Named metrics over the aggregated snapshot.
//!
//! Each metric is a pure function of the staking and pool summaries, tagged
//! with the metric-set version that introduced it. A report for version `v`
//! contains every metric with `since <= v`, in registration order.

use crate::models::{AggregateReport, MetricValue};
use crate::services::pool_aggregator::PoolSummary;
use crate::services::staking_aggregator::StakingSummary;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricSetVersion {
    /// Counts and totals.
    V1 = 1,
    /// Unbonding schedule, unslashed pools, member averages, pool rewards.
    V2 = 2,
    /// Inactive nominator breakdown, member threshold checks, anomaly counts.
    V3 = 3,
}

impl MetricSetVersion {
    pub const LATEST: MetricSetVersion = MetricSetVersion::V3;
}

impl Default for MetricSetVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

impl fmt::Display for MetricSetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl FromStr for MetricSetVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(['v', 'V']) {
            "1" => Ok(MetricSetVersion::V1),
            "2" => Ok(MetricSetVersion::V2),
            "3" => Ok(MetricSetVersion::V3),
            other => Err(format!("unknown metric set version {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Staking,
    Pools,
}

impl Domain {
    pub fn prefix(&self) -> &'static str {
        match self {
            Domain::Staking => "staking",
            Domain::Pools => "pools",
        }
    }
}

/// What a metric reads.
pub struct MetricInputs<'a> {
    pub staking: &'a StakingSummary,
    pub pools: &'a PoolSummary,
}

pub enum Compute {
    Scalar(fn(&MetricInputs<'_>) -> MetricValue),
    /// A family of entries keyed by a suffix, e.g. one per era.
    Keyed(fn(&MetricInputs<'_>) -> Vec<(String, MetricValue)>),
}

pub struct MetricDefinition {
    pub domain: Domain,
    pub name: &'static str,
    pub since: MetricSetVersion,
    pub compute: Compute,
}

impl MetricDefinition {
    pub fn key(&self) -> String {
        format!("{}_{}", self.domain.prefix(), self.name)
    }
}

macro_rules! scalar {
    ($domain:ident, $name:literal, $since:ident, $f:expr) => {
        MetricDefinition {
            domain: Domain::$domain,
            name: $name,
            since: MetricSetVersion::$since,
            compute: Compute::Scalar($f),
        }
    };
}

pub fn registry() -> Vec<MetricDefinition> {
    vec![
        // staking
        scalar!(Staking, "currentEra", V1, |m| MetricValue::Count(
            m.staking.current_era.into()
        )),
        scalar!(Staking, "nominatorCount", V1, |m| m.staking.nominator_count.into()),
        scalar!(Staking, "validatorCount", V1, |m| m.staking.validator_count.into()),
        scalar!(Staking, "stakedAccountCount", V1, |m| m
            .staking
            .staked_account_count
            .into()),
        scalar!(Staking, "totalStaked", V1, |m| m.staking.total_staked.clone().into()),
        scalar!(Staking, "unbondingStake", V1, |m| m
            .staking
            .unbonding_stake
            .clone()
            .into()),
        scalar!(Staking, "unbondingCount", V1, |m| m.staking.unbonding_count.into()),
        scalar!(Staking, "fullyUnbondingCount", V2, |m| m
            .staking
            .fully_unbonding_count
            .into()),
        scalar!(Staking, "alreadyUnlocked", V2, |m| m
            .staking
            .schedule
            .already_unlocked
            .clone()
            .into()),
        MetricDefinition {
            domain: Domain::Staking,
            name: "unbondingAtEra",
            since: MetricSetVersion::V2,
            compute: Compute::Keyed(|m| {
                m.staking
                    .schedule
                    .by_era
                    .iter()
                    .map(|(era, value)| (era.to_string(), value.clone().into()))
                    .collect()
            }),
        },
        scalar!(Staking, "activeNominatorCount", V3, |m| m
            .staking
            .nominators
            .active_count
            .into()),
        scalar!(Staking, "inactiveNominatorCount", V3, |m| m
            .staking
            .nominators
            .inactive
            .len()
            .into()),
        scalar!(Staking, "inactiveFullyUnbondingCount", V3, |m| m
            .staking
            .nominators
            .inactive_fully_unbonding
            .into()),
        scalar!(Staking, "inactiveUnbondingCount", V3, |m| m
            .staking
            .nominators
            .inactive_unbonding
            .into()),
        scalar!(Staking, "inactiveBonded", V3, |m| m
            .staking
            .nominators
            .inactive_bonded
            .clone()
            .into()),
        scalar!(Staking, "inactiveUnbonding", V3, |m| m
            .staking
            .nominators
            .inactive_unbonding_balance
            .clone()
            .into()),
        scalar!(Staking, "nominatorsWithoutLedger", V3, |m| m
            .staking
            .nominators
            .without_ledger
            .into()),
        // pools
        scalar!(Pools, "poolsCount", V1, |m| m.pools.pools_count.into()),
        scalar!(Pools, "membersCount", V1, |m| m.pools.members_count.into()),
        scalar!(Pools, "openCount", V1, |m| m.pools.states.open.into()),
        scalar!(Pools, "blockedCount", V1, |m| m.pools.states.blocked.into()),
        scalar!(Pools, "destroyingCount", V1, |m| m.pools.states.destroying.into()),
        scalar!(Pools, "poolsStaked", V1, |m| m.pools.staked.clone().into()),
        scalar!(Pools, "poolsPoints", V1, |m| m.pools.points.clone().into()),
        scalar!(Pools, "stakingRatio", V1, |m| MetricValue::Decimal(
            m.pools.staking_ratio.clone()
        )),
        scalar!(Pools, "unslashedPoolsCount", V2, |m| m.pools.unslashed_count.into()),
        scalar!(Pools, "avgMemberPerPool", V2, |m| m
            .pools
            .avg_member_per_pool
            .clone()),
        scalar!(Pools, "poolsUnbonding", V2, |m| m.pools.unbonding.clone().into()),
        scalar!(Pools, "poolsPendingRewards", V2, |m| m
            .pools
            .pending_rewards
            .clone()
            .into()),
        scalar!(Pools, "minimumActiveStake", V3, |m| m
            .pools
            .min_active_stake
            .clone()
            .into()),
        scalar!(Pools, "membersBelowThreshold", V3, |m| m
            .pools
            .members_below_threshold
            .into()),
        scalar!(Pools, "missingLedgerCount", V3, |m| m
            .pools
            .missing_ledger_count
            .into()),
        scalar!(Pools, "negativeRewardsCount", V3, |m| m
            .pools
            .negative_rewards_count
            .into()),
    ]
}

pub fn build_report(
    definitions: &[MetricDefinition],
    version: MetricSetVersion,
    inputs: &MetricInputs<'_>,
) -> AggregateReport {
    let mut report = AggregateReport::new();
    for definition in definitions.iter().filter(|d| d.since <= version) {
        match &definition.compute {
            Compute::Scalar(f) => report.push(definition.key(), f(inputs)),
            Compute::Keyed(f) => {
                for (suffix, value) in f(inputs) {
                    report.push(format!("{}_{}", definition.key(), suffix), value);
                }
            }
        }
    }
    report
}
