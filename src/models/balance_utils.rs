use num_bigint::BigUint;
use serde::{self, de, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

/// Balances travel as decimal strings so values beyond `u64` survive JSON.
pub fn serialize_balance<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize_balance<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_balance(&raw).map_err(de::Error::custom)
}

pub fn serialize_optional_balance<S>(
    value: &Option<BigUint>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_some(&v.to_string()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize_optional_balance<'de, D>(deserializer: D) -> Result<Option<BigUint>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|s| parse_balance(&s).map_err(de::Error::custom))
        .transpose()
}

fn parse_balance(raw: &str) -> Result<BigUint, String> {
    let cleaned = raw.trim().trim_matches('"').replace('_', "");
    BigUint::from_str(&cleaned).map_err(|e| format!("invalid balance {:?}: {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(
            serialize_with = "serialize_balance",
            deserialize_with = "deserialize_balance"
        )]
        amount: BigUint,
    }

    #[test]
    fn parses_values_wider_than_u128() {
        let json = r#"{"amount":"1000000000000000000000000000000000000000"}"#;
        let holder: Holder = serde_json::from_str(json).unwrap();
        assert_eq!(
            holder.amount,
            BigUint::from(10u32).pow(39)
        );
        assert_eq!(serde_json::to_string(&holder).unwrap(), json);
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = serde_json::from_str::<Holder>(r#"{"amount":"-5"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid balance"));
    }
}
