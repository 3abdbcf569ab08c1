use crate::models::{AggregateReport, EraIndex};
use crate::services::metrics_registry::MetricSetVersion;
use chrono::{DateTime, Utc};
use log::info;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};

pub const COLLECTION: &str = "staking_metrics";

pub fn report_document(
    era: EraIndex,
    version: MetricSetVersion,
    report: &AggregateReport,
    generated_at: DateTime<Utc>,
) -> Document {
    let mut metrics = Document::new();
    for (name, value) in report.entries() {
        metrics.insert(name.clone(), value.to_string());
    }

    doc! {
        "era": era as i64,
        "metricSetVersion": version as i32,
        "generatedAt": mongodb::bson::DateTime::from_millis(generated_at.timestamp_millis()),
        "metrics": metrics,
    }
}

/// Upserts the report for `era`, replacing an earlier run at the same era and
/// metric-set version.
pub async fn save_report(
    db: &Database,
    era: EraIndex,
    version: MetricSetVersion,
    report: &AggregateReport,
    generated_at: DateTime<Utc>,
) -> Result<(), mongodb::error::Error> {
    let collection: Collection<Document> = db.collection(COLLECTION);
    let document = report_document(era, version, report, generated_at);

    collection
        .update_one(
            doc! {
                "era": era as i64,
                "metricSetVersion": version as i32,
            },
            doc! { "$set": document },
        )
        .upsert(true)
        .await?;

    info!("Saved {} metrics for era {} to {}", report.len(), era, COLLECTION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricValue;
    use chrono::TimeZone;
    use num_bigint::BigUint;

    #[test]
    fn document_keeps_metric_values_as_strings() {
        let mut report = AggregateReport::new();
        report.push(
            "staking_totalStaked".into(),
            MetricValue::Balance(BigUint::from(10u32).pow(30)),
        );
        report.push("pools_avgMemberPerPool".into(), MetricValue::NoData);
        let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let document = report_document(42, MetricSetVersion::V3, &report, at);
        assert_eq!(document.get_i64("era").unwrap(), 42);
        assert_eq!(document.get_i32("metricSetVersion").unwrap(), 3);
        assert_eq!(
            document.get_datetime("generatedAt").unwrap().timestamp_millis(),
            1_700_000_000_000
        );
        let metrics = document.get_document("metrics").unwrap();
        assert_eq!(
            metrics.get_str("staking_totalStaked").unwrap(),
            "1000000000000000000000000000000"
        );
        assert_eq!(metrics.get_str("pools_avgMemberPerPool").unwrap(), "no data");
    }
}
