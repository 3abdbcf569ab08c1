pub mod balance_utils;

mod account;
mod pool;
mod report;
mod snapshot;
mod staking;

pub use account::{AccountId, AccountIdError, ACCOUNT_ID_LEN};
pub use pool::{BondedPool, EnrichedPool, PoolId, PoolMember, PoolState};
pub use report::{AggregateReport, MetricValue, NO_DATA};
pub use snapshot::{BalanceString, ChainSnapshot, PalletId, SnapshotConstants, SnapshotCounters};
pub use staking::{EraExposure, EraIndex, IndividualExposure, StakingLedger, UnlockChunk};
