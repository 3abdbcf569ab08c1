use crate::models::balance_utils::{deserialize_balance, serialize_balance};
use crate::models::AccountId;
use num_bigint::{BigInt, BigUint};
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type PoolId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolState {
    Open,
    Blocked,
    Destroying,
}

impl fmt::Display for PoolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PoolState::Open => "open",
            PoolState::Blocked => "blocked",
            PoolState::Destroying => "destroying",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondedPool {
    pub pool_id: PoolId,
    pub state: PoolState,
    pub member_counter: u32,
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub points: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMember {
    pub account: AccountId,
    pub pool_id: PoolId,
    #[serde(
        serialize_with = "serialize_balance",
        deserialize_with = "deserialize_balance"
    )]
    pub points: BigUint,
}

/// Per-pool detail record joined from the pool, its derived accounts, its
/// staking ledger and its reward account balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPool {
    pub pool_id: PoolId,
    pub state: PoolState,
    pub members: u32,
    pub bonded_account: AccountId,
    pub reward_account: AccountId,
    pub pool_points: BigUint,
    pub pool_active_balance: BigUint,
    pub ratio_percent: BigUint,
    pub unbonding_balance: BigUint,
    pub pending_rewards: BigInt,
}

impl EnrichedPool {
    pub fn has_negative_rewards(&self) -> bool {
        self.pending_rewards.is_negative()
    }
}
