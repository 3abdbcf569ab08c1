use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use std::fmt;

pub const NO_DATA: &str = "no data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    Count(u64),
    Balance(BigUint),
    /// Fixed-point decimal, already rendered to its reported precision.
    Decimal(String),
    /// The ratio's denominator was zero.
    NoData,
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Balance(b) => write!(f, "{}", b),
            MetricValue::Decimal(d) => f.write_str(d),
            MetricValue::NoData => f.write_str(NO_DATA),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<usize> for MetricValue {
    fn from(n: usize) -> Self {
        MetricValue::Count(n as u64)
    }
}

impl From<u64> for MetricValue {
    fn from(n: u64) -> Self {
        MetricValue::Count(n)
    }
}

impl From<BigUint> for MetricValue {
    fn from(b: BigUint) -> Self {
        MetricValue::Balance(b)
    }
}

/// Metric name to value, kept in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    entries: Vec<(String, MetricValue)>,
}

impl AggregateReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: String, value: MetricValue) {
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn entries(&self) -> &[(String, MetricValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One `name value` line per metric.
    pub fn to_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(name, value)| format!("{} {}", name, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_renders_sentinel() {
        let mut report = AggregateReport::new();
        report.push("pools_avgMemberPerPool".into(), MetricValue::NoData);
        report.push("pools_poolsStaked".into(), BigUint::from(12u32).into());
        assert_eq!(
            report.to_lines(),
            vec!["pools_avgMemberPerPool no data", "pools_poolsStaked 12"]
        );
        assert_eq!(report.get("pools_poolsStaked"), Some(&MetricValue::Balance(12u32.into())));
        assert_eq!(report.get("missing"), None);
    }
}
