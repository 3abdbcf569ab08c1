use staking_pool_metrics::models::MetricValue;
use staking_pool_metrics::services::metrics_registry::MetricSetVersion;
use staking_pool_metrics::services::pipeline::{run, RunOptions};
use staking_pool_metrics::services::snapshot_gateway::SnapshotGateway;
use staking_pool_metrics::services::snapshot_loader::{load_snapshot, SnapshotSource};

const SNAPSHOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/snapshot.json");

async fn gateway() -> SnapshotGateway {
    let source = SnapshotSource::File(SNAPSHOT.into());
    SnapshotGateway::new(load_snapshot(&source).await.expect("fixture snapshot loads"))
}

fn count(n: u64) -> MetricValue {
    MetricValue::Count(n)
}

fn balance(raw: &str) -> MetricValue {
    MetricValue::Balance(raw.parse().unwrap())
}

#[tokio::test]
async fn full_report_from_fixture_snapshot() {
    let gateway = gateway().await;
    let outcome = run(&gateway, &RunOptions::default()).await.unwrap();
    let report = &outcome.report;

    let expected = [
        ("staking_currentEra", count(100)),
        ("staking_nominatorCount", count(3)),
        ("staking_validatorCount", count(1)),
        ("staking_stakedAccountCount", count(4)),
        ("staking_totalStaked", balance("3000000000000")),
        ("staking_unbondingStake", balance("600000000000")),
        ("staking_unbondingCount", count(2)),
        ("staking_fullyUnbondingCount", count(1)),
        ("staking_alreadyUnlocked", balance("200000000000")),
        ("staking_unbondingAtEra_105", balance("300000000000")),
        ("staking_unbondingAtEra_128", balance("100000000000")),
        ("staking_activeNominatorCount", count(1)),
        ("staking_inactiveNominatorCount", count(2)),
        ("staking_inactiveFullyUnbondingCount", count(1)),
        ("staking_inactiveUnbondingCount", count(1)),
        ("staking_inactiveBonded", balance("0")),
        ("staking_inactiveUnbonding", balance("500000000000")),
        ("staking_nominatorsWithoutLedger", count(1)),
        ("pools_poolsCount", count(3)),
        ("pools_membersCount", count(4)),
        ("pools_openCount", count(1)),
        ("pools_blockedCount", count(1)),
        ("pools_destroyingCount", count(1)),
        ("pools_poolsStaked", balance("1500000000000")),
        ("pools_poolsPoints", balance("1600000000000")),
        ("pools_stakingRatio", MetricValue::Decimal("0.5000".into())),
        ("pools_unslashedPoolsCount", count(1)),
        ("pools_avgMemberPerPool", MetricValue::Decimal("1.3".into())),
        ("pools_poolsUnbonding", balance("100000000000")),
        ("pools_poolsPendingRewards", balance("5000000000")),
        ("pools_minimumActiveStake", balance("300000000000")),
        ("pools_membersBelowThreshold", count(1)),
        ("pools_missingLedgerCount", count(1)),
        ("pools_negativeRewardsCount", count(1)),
    ];

    let keys: Vec<&str> = report.entries().iter().map(|(k, _)| k.as_str()).collect();
    let expected_keys: Vec<&str> = expected.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, expected_keys);
    for (key, value) in &expected {
        assert_eq!(report.get(key), Some(value), "{}", key);
    }

    assert_eq!(outcome.enrichment.pools.len(), 2);
    assert_eq!(outcome.enrichment.failures.len(), 1);
    assert_eq!(outcome.enrichment.failures[0].pool_id, 2);
}

#[tokio::test]
async fn identical_snapshot_gives_identical_report() {
    let gateway = gateway().await;
    let serial = RunOptions {
        parallel_limit: 1,
        ..RunOptions::default()
    };
    let first = run(&gateway, &serial).await.unwrap();
    let second = run(&gateway, &RunOptions::default()).await.unwrap();
    assert_eq!(first.report, second.report);
    assert_eq!(first.enrichment, second.enrichment);
}

#[tokio::test]
async fn first_metric_set_omits_later_metrics() {
    let gateway = gateway().await;
    let options = RunOptions {
        metric_set: MetricSetVersion::V1,
        ..RunOptions::default()
    };
    let report = run(&gateway, &options).await.unwrap().report;
    assert!(report.get("pools_poolsStaked").is_some());
    assert!(report.get("staking_unbondingAtEra_105").is_none());
    assert!(report.get("pools_membersBelowThreshold").is_none());
}
