use crate::models::{
    AccountId, BalanceString, BondedPool, ChainSnapshot, EraExposure, IndividualExposure,
    PalletId, PoolMember, PoolState, SnapshotConstants, SnapshotCounters, StakingLedger,
    UnlockChunk,
};
use crate::services::pool_accounts::{bonded_account, reward_account};
use num_bigint::BigUint;
use std::collections::HashMap;

pub const POOLS_PALLET: u64 = u64::from_le_bytes(*b"py/nopls");

pub fn account(seed: u8) -> AccountId {
    AccountId::new([seed; 32])
}

pub fn ledger(stash: AccountId, active: u64, total: u64, chunks: &[(u32, u64)]) -> StakingLedger {
    StakingLedger {
        stash,
        active: BigUint::from(active),
        total: BigUint::from(total),
        unlocking: chunks
            .iter()
            .map(|(era, value)| UnlockChunk {
                era: *era,
                value: BigUint::from(*value),
            })
            .collect(),
    }
}

/// Era 10 snapshot: two nominators (one exposed), pool 1 healthy, pool 2 with
/// no ledger behind its bonded account.
pub fn sample_snapshot() -> ChainSnapshot {
    let mut free_balances = HashMap::new();
    free_balances.insert(
        reward_account(POOLS_PALLET, 1),
        BalanceString(BigUint::from(50u32)),
    );

    ChainSnapshot {
        current_era: 10,
        total_staked: BigUint::from(3_000u32),
        counters: SnapshotCounters {
            nominators: Some(2),
            validators: Some(1),
            bonded_pools: Some(2),
            pool_members: Some(3),
        },
        constants: SnapshotConstants {
            existential_deposit: BigUint::from(10u32),
            pools_pallet_id: PalletId(*b"py/nopls"),
            minimum_active_stake: Some(BigUint::from(500u32)),
        },
        ledgers: vec![
            ledger(account(1), 500, 500, &[]),
            ledger(account(2), 0, 300, &[(9, 100), (12, 200)]),
            ledger(bonded_account(POOLS_PALLET, 1), 1_000, 1_200, &[(11, 200)]),
        ],
        nominators: vec![account(1), account(2)],
        exposures: vec![EraExposure {
            era: 10,
            validator: account(100),
            others: vec![IndividualExposure {
                who: account(1),
                value: BigUint::from(500u32),
            }],
        }],
        bonded_pools: vec![
            BondedPool {
                pool_id: 1,
                state: PoolState::Open,
                member_counter: 2,
                points: BigUint::from(1_000u32),
            },
            BondedPool {
                pool_id: 2,
                state: PoolState::Blocked,
                member_counter: 1,
                points: BigUint::from(500u32),
            },
        ],
        pool_members: vec![
            PoolMember {
                account: account(20),
                pool_id: 1,
                points: BigUint::from(600u32),
            },
            PoolMember {
                account: account(21),
                pool_id: 1,
                points: BigUint::from(400u32),
            },
            PoolMember {
                account: account(22),
                pool_id: 2,
                points: BigUint::from(500u32),
            },
        ],
        free_balances,
    }
}
