use crate::models::{AggregateReport, EnrichedPool};
use crate::services::pool_enrichment::PoolEnrichment;
use log::info;
use std::io::{self, Write};

pub fn write_report<W: Write>(out: &mut W, report: &AggregateReport) -> io::Result<()> {
    for line in report.to_lines() {
        writeln!(out, "{}", line)?;
    }
    info!("Emitted {} metrics", report.len());
    Ok(())
}

pub fn pool_detail_line(pool: &EnrichedPool, ss58_prefix: u16) -> String {
    format!(
        "pool_{} state={} members={} points={} active={} ratio={}% unbonding={} pendingRewards={} bonded={} reward={}",
        pool.pool_id,
        pool.state,
        pool.members,
        pool.pool_points,
        pool.pool_active_balance,
        pool.ratio_percent,
        pool.unbonding_balance,
        pool.pending_rewards,
        pool.bonded_account.to_ss58(ss58_prefix),
        pool.reward_account.to_ss58(ss58_prefix),
    )
}

/// One line per enriched pool, then one per failed pool, by pool id.
pub fn write_pool_details<W: Write>(
    out: &mut W,
    enrichment: &PoolEnrichment,
    ss58_prefix: u16,
) -> io::Result<()> {
    for pool in &enrichment.pools {
        writeln!(out, "{}", pool_detail_line(pool, ss58_prefix))?;
    }
    for failure in &enrichment.failures {
        writeln!(
            out,
            "pool_{} state={} error=\"{}\"",
            failure.pool_id, failure.state, failure.error
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnrichmentError;
    use crate::models::{MetricValue, PoolState};
    use crate::services::pool_enrichment::EnrichmentFailure;
    use crate::services::test_fixtures::account;
    use num_bigint::{BigInt, BigUint};

    #[test]
    fn report_lines_go_to_writer() {
        let mut report = AggregateReport::new();
        report.push("staking_currentEra".into(), MetricValue::Count(12));
        report.push("pools_stakingRatio".into(), MetricValue::Decimal("0.3333".into()));

        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "staking_currentEra 12\npools_stakingRatio 0.3333\n"
        );
    }

    #[test]
    fn pool_details_include_failures() {
        let enrichment = PoolEnrichment {
            pools: vec![EnrichedPool {
                pool_id: 1,
                state: PoolState::Open,
                members: 3,
                bonded_account: account(1),
                reward_account: account(2),
                pool_points: BigUint::from(10u32),
                pool_active_balance: BigUint::from(10u32),
                ratio_percent: BigUint::from(100u32),
                unbonding_balance: BigUint::from(0u32),
                pending_rewards: BigInt::from(-1),
            }],
            failures: vec![EnrichmentFailure {
                pool_id: 2,
                state: PoolState::Destroying,
                error: EnrichmentError::MissingLedger {
                    pool_id: 2,
                    bonded_account: account(3),
                },
            }],
        };

        let mut out = Vec::new();
        write_pool_details(&mut out, &enrichment, 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("pool_1 state=open members=3 points=10 active=10 ratio=100%"));
        assert!(lines[0].contains("pendingRewards=-1"));
        assert!(lines[1].starts_with("pool_2 state=destroying error="));
        assert!(lines[1].contains("has no staking ledger"));
    }
}
