use crate::models::{AccountId, PoolId, ACCOUNT_ID_LEN};

const MODULE_PREFIX: &[u8; 4] = b"modl";

/// The two sub-accounts every nomination pool owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolAccount {
    Bonded = 0,
    Reward = 1,
}

/// `"modl" ++ pallet_id(le, 8) ++ index(1) ++ pool_id(le, 4)`, zero-padded to
/// 32 bytes.
pub fn derive_pool_account(pallet_id: u64, pool_id: PoolId, kind: PoolAccount) -> AccountId {
    let mut bytes = [0u8; ACCOUNT_ID_LEN];
    bytes[0..4].copy_from_slice(MODULE_PREFIX);
    bytes[4..12].copy_from_slice(&pallet_id.to_le_bytes());
    bytes[12] = kind as u8;
    bytes[13..17].copy_from_slice(&pool_id.to_le_bytes());
    AccountId::new(bytes)
}

pub fn bonded_account(pallet_id: u64, pool_id: PoolId) -> AccountId {
    derive_pool_account(pallet_id, pool_id, PoolAccount::Bonded)
}

pub fn reward_account(pallet_id: u64, pool_id: PoolId) -> AccountId {
    derive_pool_account(pallet_id, pool_id, PoolAccount::Reward)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOLS_PALLET: u64 = u64::from_le_bytes(*b"py/nopls");

    #[test]
    fn bonded_account_layout() {
        let account = bonded_account(POOLS_PALLET, 1);
        let mut expected = [0u8; 32];
        expected[..12].copy_from_slice(b"modlpy/nopls");
        expected[13] = 1;
        assert_eq!(account.as_bytes(), &expected);
    }

    #[test]
    fn reward_account_sets_index_byte() {
        let account = reward_account(POOLS_PALLET, 0x0102_0304);
        let bytes = account.as_bytes();
        assert_eq!(&bytes[..12], b"modlpy/nopls");
        assert_eq!(bytes[12], 1);
        assert_eq!(&bytes[13..17], &[0x04, 0x03, 0x02, 0x01]);
        assert!(bytes[17..].iter().all(|b| *b == 0));
    }

    #[test]
    fn derivation_is_deterministic_and_distinct() {
        assert_eq!(bonded_account(POOLS_PALLET, 7), bonded_account(POOLS_PALLET, 7));
        assert_ne!(bonded_account(POOLS_PALLET, 7), reward_account(POOLS_PALLET, 7));
        assert_ne!(bonded_account(POOLS_PALLET, 7), bonded_account(POOLS_PALLET, 8));
    }

    #[test]
    fn max_pool_id_fits() {
        let bytes = *bonded_account(POOLS_PALLET, u32::MAX).as_bytes();
        assert_eq!(&bytes[13..17], &[0xff; 4]);
    }
}
