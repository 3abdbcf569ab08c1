use crate::models::balance_utils::{
    deserialize_balance, deserialize_optional_balance, serialize_balance,
    serialize_optional_balance,
};
use crate::models::{AccountId, BondedPool, EraExposure, EraIndex, PoolMember, StakingLedger};
use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// A decoded, point-in-time copy of every collection the metrics need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub current_era: EraIndex,
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub total_staked: BigUint,
    #[serde(default)]
    pub counters: SnapshotCounters,
    pub constants: SnapshotConstants,
    #[serde(default)]
    pub ledgers: Vec<StakingLedger>,
    #[serde(default)]
    pub nominators: Vec<AccountId>,
    #[serde(default)]
    pub exposures: Vec<EraExposure>,
    #[serde(default)]
    pub bonded_pools: Vec<BondedPool>,
    #[serde(default)]
    pub pool_members: Vec<PoolMember>,
    #[serde(default)]
    pub free_balances: HashMap<AccountId, BalanceString>,
}

/// Protocol-maintained counters. Missing values fall back to collection sizes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotCounters {
    pub nominators: Option<u64>,
    pub validators: Option<u64>,
    pub bonded_pools: Option<u64>,
    pub pool_members: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConstants {
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub existential_deposit: BigUint,
    pub pools_pallet_id: PalletId,
    #[serde(
        default,
        serialize_with = "serialize_optional_balance",
        deserialize_with = "deserialize_optional_balance"
    )]
    pub minimum_active_stake: Option<BigUint>,
}

/// Free balance map values, kept as a newtype so the map can use the string
/// encoding shared with every other balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceString(
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub BigUint,
);

/// Eight-byte module identifier, written as ASCII in snapshots (`"py/nopls"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PalletId(pub [u8; 8]);

impl PalletId {
    /// The integer whose little-endian bytes are this identifier.
    pub fn as_u64(&self) -> u64 {
        u64::from_le_bytes(self.0)
    }
}

impl Serialize for PalletId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

impl<'de> Deserialize<'de> for PalletId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let bytes: [u8; 8] = raw.as_bytes().try_into().map_err(|_| {
            de::Error::custom(format!("pallet id must be 8 ASCII bytes, got {:?}", raw))
        })?;
        Ok(PalletId(bytes))
    }
}
