use crate::error::GatewayError;
use crate::models::{
    AccountId, BondedPool, EraExposure, EraIndex, PoolId, PoolMember, StakingLedger,
};
use async_trait::async_trait;
use num_bigint::BigUint;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    ExistentialDeposit,
    PoolsPalletId,
    MinimumActiveStake,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Constant::ExistentialDeposit => "balances.existentialDeposit",
            Constant::PoolsPalletId => "nominationPools.palletId",
            Constant::MinimumActiveStake => "staking.minimumActiveStake",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantValue {
    Balance(BigUint),
    Integer(u64),
}

/// Protocol-maintained counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Nominators,
    Validators,
    BondedPools,
    PoolMembers,
}

/// Read-only access to the chain state a run aggregates. Implementations may
/// be slow and may be called concurrently; they never retry.
#[async_trait]
pub trait ChainGateway: Send + Sync {
    async fn get_ledger(&self, account: &AccountId) -> Result<Option<StakingLedger>, GatewayError>;

    async fn list_ledgers(&self) -> Result<Vec<(AccountId, StakingLedger)>, GatewayError>;

    async fn list_nominators(&self) -> Result<Vec<AccountId>, GatewayError>;

    async fn get_era_exposures(&self, era: EraIndex) -> Result<Vec<EraExposure>, GatewayError>;

    async fn get_current_era(&self) -> Result<EraIndex, GatewayError>;

    async fn get_era_total_stake(&self, era: EraIndex) -> Result<BigUint, GatewayError>;

    async fn list_bonded_pools(&self) -> Result<Vec<(PoolId, BondedPool)>, GatewayError>;

    async fn list_pool_members(&self) -> Result<Vec<PoolMember>, GatewayError>;

    /// Free balance of `account`; zero for accounts that do not exist.
    async fn get_free_balance(&self, account: &AccountId) -> Result<BigUint, GatewayError>;

    async fn get_constant(&self, constant: Constant) -> Result<Option<ConstantValue>, GatewayError>;

    async fn get_counter(&self, counter: Counter) -> Result<u64, GatewayError>;
}
