use crate::models::balance_utils::{deserialize_balance, serialize_balance};
use crate::models::AccountId;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

pub type EraIndex = u32;

/// A portion of stake that becomes free at `era`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockChunk {
    pub era: EraIndex,
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub value: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingLedger {
    pub stash: AccountId,
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub active: BigUint,
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub total: BigUint,
    #[serde(default)]
    pub unlocking: Vec<UnlockChunk>,
}

impl StakingLedger {
    /// `total - active`, or zero for a ledger whose total is below its active
    /// balance.
    pub fn unbonding(&self) -> BigUint {
        if self.total > self.active {
            &self.total - &self.active
        } else {
            BigUint::zero()
        }
    }

    pub fn is_unbonding(&self) -> bool {
        self.total != self.active
    }

    pub fn is_fully_unbonding(&self) -> bool {
        self.active.is_zero() && !self.unlocking.is_empty()
    }

    /// Checks `total == active + sum(unlocking)`.
    pub fn is_consistent(&self) -> bool {
        let unlocking: BigUint = self.unlocking.iter().map(|chunk| &chunk.value).sum();
        self.total == &self.active + unlocking
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualExposure {
    pub who: AccountId,
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub value: BigUint,
}

/// Nominator contributions backing one validator in one era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EraExposure {
    pub era: EraIndex,
    pub validator: AccountId,
    #[serde(default)]
    pub others: Vec<IndividualExposure>,
}
