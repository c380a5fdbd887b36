//! Fuzz testing scenarios that drive the simulated ledger
//!
//! Each action is applied to a [`SimulatedLedger`] and then checked against
//! the invariants in [`crate::invariants`]. Precondition failures come back
//! as [`SimulationResult::Error`]; anything that breaks an invariant comes
//! back as [`SimulationResult::InvariantViolation`].

use std::collections::HashMap;
use std::thread;

use tracing::{debug, trace};

use crate::arbitrary::{LedgerAction, LedgerActionSequence, ADMINS, OWNER};
use crate::invariants::*;
use crate::ledger::{LedgerError, SharedLedger, SimulatedLedger, TaskLockStatus};
use crate::params::LedgerParams;
use crate::store::{AccountId, BalanceRecord, TaskId};

/// Result of a simulated instruction execution
#[derive(Debug, Clone)]
pub enum SimulationResult {
    Success,
    Error(String),
    InvariantViolation(String),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SimulationResult::Error(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimulationResult::InvariantViolation(_))
    }
}

impl From<LedgerError> for SimulationResult {
    fn from(err: LedgerError) -> Self {
        SimulationResult::Error(format!("{:?}", err))
    }
}

/// Lamports moved per account since the ledger was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountFlow {
    pub deposited: u128,
    pub withdrawn: u128,
    pub slashed: u128,
}

#[derive(Debug, Clone, Default)]
pub struct FlowTracker {
    flows: HashMap<AccountId, AccountFlow>,
}

impl FlowTracker {
    pub fn flow(&self, account: &AccountId) -> AccountFlow {
        self.flows.get(account).copied().unwrap_or_default()
    }

    fn entry(&mut self, account: AccountId) -> &mut AccountFlow {
        self.flows.entry(account).or_default()
    }

    fn check(&self, account: AccountId, balance: &BalanceRecord) -> CustodyInvariantResult {
        let flow = self.flow(&account);
        check_net_flow(account, flow.deposited, flow.withdrawn, flow.slashed, balance)
    }
}

/// Ledger with the actor pool roles applied: actor 0 owns it, actors 1 and
/// 2 are admins.
pub fn seeded_ledger(base_collateral: u64) -> Result<SimulatedLedger, LedgerError> {
    let mut ledger =
        SimulatedLedger::with_params(OWNER, LedgerParams::with_base_collateral(base_collateral))?;
    for admin in ADMINS {
        ledger.add_admin(&OWNER, admin)?;
    }
    Ok(ledger)
}

fn action_caller(action: &LedgerAction) -> AccountId {
    use LedgerAction::*;
    match action {
        Deposit { caller, .. }
        | Withdraw { caller, .. }
        | Lock { caller, .. }
        | Unlock { caller, .. }
        | Slash { caller, .. }
        | WithdrawSlashed { caller, .. }
        | AddAdmin { caller, .. }
        | RemoveAdmin { caller, .. }
        | SetCollateralRatio { caller, .. }
        | SetSlashRatio { caller, .. }
        | SetBaseCollateral { caller, .. } => *caller,
    }
}

fn action_task(action: &LedgerAction) -> Option<TaskId> {
    match action {
        LedgerAction::Lock { task_id, .. }
        | LedgerAction::Unlock { task_id, .. }
        | LedgerAction::Slash { task_id, .. } => Some(*task_id),
        _ => None,
    }
}

/// Whether `caller` held the role `action` needs before it ran.
fn caller_authorized(ledger: &SimulatedLedger, action: &LedgerAction) -> bool {
    let caller = action_caller(action);
    match action {
        LedgerAction::Deposit { .. } => true,
        LedgerAction::Withdraw { account, .. } => caller == *account,
        LedgerAction::Lock { .. } | LedgerAction::Unlock { .. } | LedgerAction::Slash { .. } => {
            ledger.is_admin(&caller)
        }
        _ => caller == ledger.owner(),
    }
}

/// Applies one action and checks every invariant that can be observed
/// around it.
pub fn apply_action(
    ledger: &mut SimulatedLedger,
    flows: &mut FlowTracker,
    action: &LedgerAction,
) -> SimulationResult {
    let before = ledger.clone();
    let caller = action_caller(action);
    let authorized = caller_authorized(&before, action);

    let outcome: Result<Option<AccountId>, LedgerError> = match *action {
        LedgerAction::Deposit {
            account,
            amount,
            transferred,
            ..
        } => ledger
            .deposit(&caller, account, amount, transferred)
            .map(|_| {
                flows.entry(account).deposited += amount as u128;
                Some(account)
            }),
        LedgerAction::Withdraw { account, amount, .. } => {
            ledger.withdraw(&caller, account, amount).map(|_| {
                flows.entry(account).withdrawn += amount as u128;
                Some(account)
            })
        }
        LedgerAction::Lock {
            account, task_id, ..
        } => ledger
            .lock_collateral(&caller, account, task_id)
            .map(|_| Some(account)),
        LedgerAction::Unlock { task_id, .. } => {
            let account = before.tasks(&task_id).account;
            ledger
                .unlock_collateral(&caller, task_id)
                .map(|_| Some(account))
        }
        LedgerAction::Slash { task_id, .. } => {
            let collateral = before.tasks(&task_id).collateral;
            match ledger.slash_collateral(&caller, task_id) {
                Ok(receipt) => {
                    if let SlashInvariantResult::SplitMismatch {
                        collateral,
                        penalty,
                        returned,
                    } = check_slash_split(collateral, &receipt)
                    {
                        return SimulationResult::InvariantViolation(format!(
                            "S1: bond {} split into penalty {} + returned {}",
                            collateral, penalty, returned
                        ));
                    }
                    if let SlashInvariantResult::PoolMismatch {
                        before,
                        after,
                        penalty,
                    } = check_slash_pool(before.slashed_funds(), ledger.slashed_funds(), receipt.penalty)
                    {
                        return SimulationResult::InvariantViolation(format!(
                            "S2: pool {} -> {} for penalty {}",
                            before, after, penalty
                        ));
                    }
                    flows.entry(receipt.account).slashed += receipt.penalty as u128;
                    Ok(Some(receipt.account))
                }
                Err(e) => Err(e),
            }
        }
        LedgerAction::WithdrawSlashed { amount, .. } => ledger
            .withdraw_slashed_funds(&caller, amount)
            .map(|_| None),
        LedgerAction::AddAdmin { admin, .. } => ledger.add_admin(&caller, admin).map(|_| None),
        LedgerAction::RemoveAdmin { admin, .. } => {
            ledger.remove_admin(&caller, admin).map(|_| None)
        }
        LedgerAction::SetCollateralRatio { value, .. } => {
            ledger.set_collateral_ratio(&caller, value).map(|_| None)
        }
        LedgerAction::SetSlashRatio { value, .. } => {
            ledger.set_slash_ratio(&caller, value).map(|_| None)
        }
        LedgerAction::SetBaseCollateral { value, .. } => {
            ledger.set_base_collateral(&caller, value).map(|_| None)
        }
    };

    let touched = match outcome {
        Ok(touched) => touched,
        Err(err) => {
            // A1: failed calls have no effect
            if *ledger != before {
                return SimulationResult::InvariantViolation(format!(
                    "A1: failed {:?} modified the ledger",
                    action
                ));
            }
            if !authorized && err != LedgerError::Unauthorized && authorization_checked_first(action) {
                return SimulationResult::InvariantViolation(format!(
                    "A2: unauthorized {:?} failed with {:?}",
                    action, err
                ));
            }
            trace!(?action, ?err, "action rejected");
            return err.into();
        }
    };

    // A2: role gates hold
    if !authorized {
        return SimulationResult::InvariantViolation(format!(
            "A2: {:?} succeeded without the required role",
            action
        ));
    }

    if let Some(task_id) = action_task(action) {
        let old = before.tasks(&task_id);
        let new = ledger.tasks(&task_id);
        match check_lock_transition(&old, &new) {
            LockInvariantResult::Valid => {}
            other => {
                return SimulationResult::InvariantViolation(format!(
                    "L1: {} {:?}",
                    task_id, other
                ))
            }
        }
    }

    if let Some(account) = touched {
        if let CustodyInvariantResult::NetFlowMismatch {
            account,
            expected,
            actual,
        } = flows.check(account, &ledger.balance(&account))
        {
            return SimulationResult::InvariantViolation(format!(
                "C3: {} holds {} but net flow is {}",
                account, actual, expected
            ));
        }
    }

    match check_ledger(ledger) {
        Ok(()) => SimulationResult::Success,
        Err(violation) => SimulationResult::InvariantViolation(violation),
    }
}

/// Actions whose handlers reject a caller without the role before looking
/// at any other input.
fn authorization_checked_first(action: &LedgerAction) -> bool {
    !matches!(action, LedgerAction::Deposit { .. })
}

/// Runs a whole sequence against a fresh seeded ledger and stops at the
/// first invariant violation.
pub fn run_sequence(sequence: &LedgerActionSequence) -> (SimulatedLedger, Vec<SimulationResult>) {
    let mut ledger = match seeded_ledger(sequence.base_collateral) {
        Ok(ledger) => ledger,
        Err(err) => return (SimulatedLedger::new(OWNER), vec![err.into()]),
    };
    let mut flows = FlowTracker::default();
    let mut results = Vec::with_capacity(sequence.actions.len());

    for action in &sequence.actions {
        let result = apply_action(&mut ledger, &mut flows, action);
        let violated = result.is_invariant_violation();
        results.push(result);
        if violated {
            break;
        }
    }

    debug!(
        actions = results.len(),
        succeeded = results.iter().filter(|r| r.is_success()).count(),
        "sequence finished"
    );
    (ledger, results)
}

/// Deposit 2 SOL, lock with base 0.1 SOL and ratios 5/2, then slash.
/// The provider ends with 1.8 SOL available and the pool with 0.2 SOL.
pub fn simulate_reference_slash() -> SimulationResult {
    const SOL: u64 = 1_000_000_000;
    let provider = AccountId::from_seed(3);
    let task_id = TaskId::from_seed(0);

    let mut ledger = match seeded_ledger(SOL / 10) {
        Ok(ledger) => ledger,
        Err(err) => return err.into(),
    };
    let mut flows = FlowTracker::default();
    let steps = [
        LedgerAction::Deposit {
            caller: provider,
            account: provider,
            amount: 2 * SOL,
            transferred: 2 * SOL,
        },
        LedgerAction::Lock {
            caller: ADMINS[0],
            account: provider,
            task_id,
        },
        LedgerAction::Slash {
            caller: ADMINS[1],
            task_id,
        },
    ];
    for step in &steps {
        let result = apply_action(&mut ledger, &mut flows, step);
        if !result.is_success() {
            return result;
        }
    }

    let record = ledger.tasks(&task_id);
    if ledger.balances(&provider) != 1_800_000_000
        || ledger.frozen_balance(&provider) != 0
        || ledger.slashed_funds() != 200_000_000
        || record.status != TaskLockStatus::Resolved
    {
        return SimulationResult::InvariantViolation(format!(
            "reference slash: available {} frozen {} pool {}",
            ledger.balances(&provider),
            ledger.frozen_balance(&provider),
            ledger.slashed_funds()
        ));
    }
    SimulationResult::Success
}

/// Fires one withdrawal per request from separate threads against a shared
/// ledger and checks that the total paid never exceeds what was available.
pub fn simulate_concurrent_withdrawals(
    ledger: SimulatedLedger,
    account: AccountId,
    requests: &[u64],
) -> (SimulatedLedger, Vec<SimulationResult>) {
    let available = ledger.balances(&account);
    let paid_before = ledger.paid_out(&account);
    let shared = SharedLedger::new(ledger);

    let outcomes: Vec<Result<BalanceRecord, LedgerError>> = thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|&amount| {
                let shared = shared.clone();
                scope.spawn(move || shared.with(|l| l.withdraw(&account, account, amount)))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(Err(LedgerError::InvalidState)))
            .collect()
    });

    let ledger = shared.snapshot();
    let paid: u128 = requests
        .iter()
        .zip(&outcomes)
        .filter(|(_, o)| o.is_ok())
        .map(|(&amount, _)| amount as u128)
        .sum();

    let mut results: Vec<SimulationResult> = outcomes
        .into_iter()
        .map(|o| match o {
            Ok(_) => SimulationResult::Success,
            Err(err) => err.into(),
        })
        .collect();

    if paid > available as u128 {
        results.push(SimulationResult::InvariantViolation(format!(
            "W1: paid {} out of {} available",
            paid, available
        )));
    } else if ledger.paid_out(&account) as u128 != paid_before as u128 + paid
        || ledger.balances(&account) as u128 != available as u128 - paid
    {
        results.push(SimulationResult::InvariantViolation(format!(
            "W2: ledger shows {} available after paying {} of {}",
            ledger.balances(&account),
            paid,
            available
        )));
    }
    if let Err(violation) = check_ledger(&ledger) {
        results.push(SimulationResult::InvariantViolation(violation));
    }

    (ledger, results)
}
