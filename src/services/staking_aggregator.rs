use crate::models::{AccountId, EraExposure, EraIndex, StakingLedger};
use log::debug;
use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub struct StakingInputs<'a> {
    pub current_era: EraIndex,
    pub nominator_count: u64,
    pub validator_count: u64,
    pub total_staked: &'a BigUint,
    pub ledgers: &'a [(AccountId, StakingLedger)],
    pub nominators: &'a [AccountId],
    pub exposures: &'a [EraExposure],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnbondingSchedule {
    /// Chunks whose era has already been reached.
    pub already_unlocked: BigUint,
    /// Future eras, ascending.
    pub by_era: BTreeMap<EraIndex, BigUint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NominatorActivity {
    pub active_count: usize,
    /// Sorted, deduplicated.
    pub inactive: Vec<AccountId>,
    pub inactive_fully_unbonding: usize,
    pub inactive_unbonding: usize,
    pub inactive_bonded: BigUint,
    pub inactive_unbonding_balance: BigUint,
    pub without_ledger: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakingSummary {
    pub current_era: EraIndex,
    pub nominator_count: u64,
    pub validator_count: u64,
    pub staked_account_count: usize,
    pub total_staked: BigUint,
    pub unbonding_stake: BigUint,
    pub unbonding_count: usize,
    pub fully_unbonding_count: usize,
    pub schedule: UnbondingSchedule,
    pub nominators: NominatorActivity,
}

pub fn summarize_staking(inputs: &StakingInputs<'_>) -> StakingSummary {
    let ledgers: Vec<&StakingLedger> = inputs.ledgers.iter().map(|(_, ledger)| ledger).collect();
    let active = active_accounts(inputs.exposures, inputs.current_era);

    StakingSummary {
        current_era: inputs.current_era,
        nominator_count: inputs.nominator_count,
        validator_count: inputs.validator_count,
        staked_account_count: ledgers.len(),
        total_staked: inputs.total_staked.clone(),
        unbonding_stake: unbonding_stake(&ledgers),
        unbonding_count: unbonding_count(&ledgers),
        fully_unbonding_count: fully_unbonding_count(&ledgers),
        schedule: unbonding_schedule(&ledgers, inputs.current_era),
        nominators: classify_nominators(inputs.nominators, inputs.ledgers, &active),
    }
}

pub fn unbonding_stake(ledgers: &[&StakingLedger]) -> BigUint {
    ledgers.iter().map(|ledger| ledger.unbonding()).sum()
}

pub fn unbonding_count(ledgers: &[&StakingLedger]) -> usize {
    ledgers.iter().filter(|ledger| ledger.is_unbonding()).count()
}

pub fn fully_unbonding_count(ledgers: &[&StakingLedger]) -> usize {
    ledgers
        .iter()
        .filter(|ledger| ledger.is_fully_unbonding())
        .count()
}

pub fn unbonding_schedule(ledgers: &[&StakingLedger], current_era: EraIndex) -> UnbondingSchedule {
    ledgers
        .iter()
        .flat_map(|ledger| ledger.unlocking.iter())
        .fold(UnbondingSchedule::default(), |mut schedule, chunk| {
            if chunk.era <= current_era {
                schedule.already_unlocked += &chunk.value;
            } else {
                *schedule.by_era.entry(chunk.era).or_insert_with(BigUint::zero) += &chunk.value;
            }
            schedule
        })
}

/// Accounts backing any validator in `era`.
pub fn active_accounts(exposures: &[EraExposure], era: EraIndex) -> HashSet<AccountId> {
    exposures
        .iter()
        .filter(|exposure| exposure.era == era)
        .flat_map(|exposure| exposure.others.iter().map(|other| other.who))
        .collect()
}

/// Splits nominators by exposure. Inactive nominators without a ledger count
/// towards `without_ledger` and add nothing to the balance sums.
pub fn classify_nominators(
    nominators: &[AccountId],
    ledgers: &[(AccountId, StakingLedger)],
    active: &HashSet<AccountId>,
) -> NominatorActivity {
    let by_account: HashMap<&AccountId, &StakingLedger> =
        ledgers.iter().map(|(account, ledger)| (account, ledger)).collect();
    let distinct: BTreeSet<&AccountId> = nominators.iter().collect();

    let mut activity = NominatorActivity::default();
    for nominator in distinct {
        if active.contains(nominator) {
            activity.active_count += 1;
            continue;
        }
        activity.inactive.push(*nominator);

        let ledger = match by_account.get(nominator) {
            Some(ledger) => ledger,
            None => {
                debug!("Nominator {} has no ledger in this snapshot", nominator);
                activity.without_ledger += 1;
                continue;
            }
        };
        if ledger.active.is_zero() {
            activity.inactive_fully_unbonding += 1;
        }
        if !ledger.unlocking.is_empty() {
            activity.inactive_unbonding += 1;
        }
        activity.inactive_bonded += &ledger.active;
        activity.inactive_unbonding_balance += ledger.unbonding();
    }
    activity
}
