use crate::error::GatewayError;
use crate::models::{
    AccountId, BondedPool, ChainSnapshot, EraExposure, EraIndex, PoolId, PoolMember,
    StakingLedger,
};
use crate::services::gateway::{ChainGateway, Constant, ConstantValue, Counter};
use async_trait::async_trait;
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::{HashMap, HashSet};

/// Serves gateway reads from a decoded in-memory snapshot.
pub struct SnapshotGateway {
    snapshot: ChainSnapshot,
    ledgers_by_stash: HashMap<AccountId, usize>,
}

impl SnapshotGateway {
    pub fn new(snapshot: ChainSnapshot) -> Self {
        let ledgers_by_stash = snapshot
            .ledgers
            .iter()
            .enumerate()
            .map(|(index, ledger)| (ledger.stash, index))
            .collect();
        Self {
            snapshot,
            ledgers_by_stash,
        }
    }

    fn distinct_validators(&self) -> u64 {
        self.snapshot
            .exposures
            .iter()
            .filter(|exposure| exposure.era == self.snapshot.current_era)
            .map(|exposure| exposure.validator)
            .collect::<HashSet<_>>()
            .len() as u64
    }
}

#[async_trait]
impl ChainGateway for SnapshotGateway {
    async fn get_ledger(&self, account: &AccountId) -> Result<Option<StakingLedger>, GatewayError> {
        Ok(self
            .ledgers_by_stash
            .get(account)
            .map(|&index| self.snapshot.ledgers[index].clone()))
    }

    async fn list_ledgers(&self) -> Result<Vec<(AccountId, StakingLedger)>, GatewayError> {
        Ok(self
            .snapshot
            .ledgers
            .iter()
            .map(|ledger| (ledger.stash, ledger.clone()))
            .collect())
    }

    async fn list_nominators(&self) -> Result<Vec<AccountId>, GatewayError> {
        Ok(self.snapshot.nominators.clone())
    }

    async fn get_era_exposures(&self, era: EraIndex) -> Result<Vec<EraExposure>, GatewayError> {
        Ok(self
            .snapshot
            .exposures
            .iter()
            .filter(|exposure| exposure.era == era)
            .cloned()
            .collect())
    }

    async fn get_current_era(&self) -> Result<EraIndex, GatewayError> {
        Ok(self.snapshot.current_era)
    }

    async fn get_era_total_stake(&self, era: EraIndex) -> Result<BigUint, GatewayError> {
        if era == self.snapshot.current_era {
            Ok(self.snapshot.total_staked.clone())
        } else {
            Err(GatewayError::Unavailable(format!(
                "snapshot only holds total stake for era {}, not {}",
                self.snapshot.current_era, era
            )))
        }
    }

    async fn list_bonded_pools(&self) -> Result<Vec<(PoolId, BondedPool)>, GatewayError> {
        Ok(self
            .snapshot
            .bonded_pools
            .iter()
            .map(|pool| (pool.pool_id, pool.clone()))
            .collect())
    }

    async fn list_pool_members(&self) -> Result<Vec<PoolMember>, GatewayError> {
        Ok(self.snapshot.pool_members.clone())
    }

    async fn get_free_balance(&self, account: &AccountId) -> Result<BigUint, GatewayError> {
        match self.snapshot.free_balances.get(account) {
            Some(balance) => Ok(balance.0.clone()),
            None => {
                debug!("No free balance for {}, treating as zero", account);
                Ok(BigUint::zero())
            }
        }
    }

    async fn get_constant(&self, constant: Constant) -> Result<Option<ConstantValue>, GatewayError> {
        let constants = &self.snapshot.constants;
        Ok(match constant {
            Constant::ExistentialDeposit => {
                Some(ConstantValue::Balance(constants.existential_deposit.clone()))
            }
            Constant::PoolsPalletId => {
                Some(ConstantValue::Integer(constants.pools_pallet_id.as_u64()))
            }
            Constant::MinimumActiveStake => constants
                .minimum_active_stake
                .clone()
                .map(ConstantValue::Balance),
        })
    }

    async fn get_counter(&self, counter: Counter) -> Result<u64, GatewayError> {
        let counters = &self.snapshot.counters;
        Ok(match counter {
            Counter::Nominators => counters
                .nominators
                .unwrap_or(self.snapshot.nominators.len() as u64),
            Counter::Validators => counters
                .validators
                .unwrap_or_else(|| self.distinct_validators()),
            Counter::BondedPools => counters
                .bonded_pools
                .unwrap_or(self.snapshot.bonded_pools.len() as u64),
            Counter::PoolMembers => counters
                .pool_members
                .unwrap_or(self.snapshot.pool_members.len() as u64),
        })
    }
}
