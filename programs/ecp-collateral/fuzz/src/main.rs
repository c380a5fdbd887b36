//! Fuzz test runner for the ECP collateral ledger
//!
//! Run with: cargo run --release
//! Or: cargo test (for property-based tests)

use ecp_collateral_fuzz::*;
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ITERATIONS: usize = 100;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let iterations = std::env::var("FUZZ_ITERATIONS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ITERATIONS);

    println!("=== ECP Collateral Ledger Fuzz Testing ===\n");

    let start = Instant::now();
    let mut total_tests = 0;
    let mut passed = 0;
    let mut failed = 0;

    println!("Running deposit/withdraw fuzz tests...");
    let (p, f) = run_deposit_withdraw_fuzz(iterations);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running lock lifecycle fuzz tests...");
    let (p, f) = run_lock_lifecycle_fuzz(iterations);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running action sequence fuzz tests...");
    let (p, f) = run_action_sequence_fuzz(iterations);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running edge case tests...");
    let (p, f) = run_edge_case_tests();
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running concurrent withdrawal tests...");
    let (p, f) = run_concurrency_tests(iterations / 2);
    passed += p;
    failed += f;
    total_tests += p + f;

    let duration = start.elapsed();

    println!("\n=== Fuzz Testing Complete ===");
    println!("Total tests: {}", total_tests);
    println!("Passed: {}", passed);
    println!("Failed: {}", failed);
    println!("Duration: {:?}", duration);
    info!(total_tests, passed, failed, ?duration, "fuzz run finished");

    if failed > 0 {
        std::process::exit(1);
    }
}

fn generate<T: Arbitrary>(runner: &mut proptest::test_runner::TestRunner) -> Option<T> {
    match any::<T>().new_tree(runner) {
        Ok(tree) => Some(tree.current()),
        Err(reason) => {
            error!(?reason, "input generation failed");
            None
        }
    }
}

fn record(label: &str, i: usize, result: &SimulationResult, passed: &mut usize, failed: &mut usize) {
    if result.is_invariant_violation() {
        println!("  [FAIL] {} iteration {}: {:?}", label, i, result);
        *failed += 1;
    } else {
        *passed += 1;
    }
}

fn run_deposit_withdraw_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let Some(input) = generate::<DepositWithdrawInput>(&mut runner) else {
            failed += 1;
            continue;
        };
        let mut ledger = SimulatedLedger::new(OWNER);
        let mut flows = FlowTracker::default();

        let deposits = input.deposits.iter().map(|&amount| LedgerAction::Deposit {
            caller: input.account,
            account: input.account,
            amount,
            transferred: amount,
        });
        let withdrawals = input.withdrawals.iter().map(|&amount| LedgerAction::Withdraw {
            caller: input.account,
            account: input.account,
            amount,
        });

        let result = deposits
            .chain(withdrawals)
            .map(|action| apply_action(&mut ledger, &mut flows, &action))
            .find(|r| r.is_invariant_violation())
            .unwrap_or(SimulationResult::Success);
        record("deposit_withdraw", i, &result, &mut passed, &mut failed);
    }

    println!("  deposit_withdraw: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_lock_lifecycle_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let Some(input) = generate::<LockInput>(&mut runner) else {
            failed += 1;
            continue;
        };
        let params = LedgerParams {
            base_collateral: input.base_collateral,
            collateral_ratio: input.collateral_ratio,
            slash_ratio: input.slash_ratio,
        };
        let mut ledger = match SimulatedLedger::with_params(OWNER, params) {
            Ok(ledger) => ledger,
            Err(_) => {
                passed += 1;
                continue;
            }
        };
        let mut flows = FlowTracker::default();

        let resolve = if i % 2 == 0 {
            LedgerAction::Unlock {
                caller: OWNER,
                task_id: input.task_id,
            }
        } else {
            LedgerAction::Slash {
                caller: OWNER,
                task_id: input.task_id,
            }
        };
        let steps = [
            LedgerAction::Deposit {
                caller: input.account,
                account: input.account,
                amount: input.deposit,
                transferred: input.deposit,
            },
            LedgerAction::Lock {
                caller: OWNER,
                account: input.account,
                task_id: input.task_id,
            },
            resolve,
        ];

        let result = steps
            .iter()
            .map(|action| apply_action(&mut ledger, &mut flows, action))
            .find(|r| r.is_invariant_violation())
            .unwrap_or(SimulationResult::Success);
        record("lock_lifecycle", i, &result, &mut passed, &mut failed);
    }

    println!("  lock_lifecycle: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_action_sequence_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let Some(sequence) = generate::<LedgerActionSequence>(&mut runner) else {
            failed += 1;
            continue;
        };
        let (_, results) = run_sequence(&sequence);
        let result = results
            .into_iter()
            .find(|r| r.is_invariant_violation())
            .unwrap_or(SimulationResult::Success);
        record("action_sequence", i, &result, &mut passed, &mut failed);
    }

    println!("  action_sequence: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_edge_case_tests() -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    // Reference slash: 2 SOL deposit, base 0.1 SOL, ratios 5/2
    {
        let result = simulate_reference_slash();
        if result.is_success() {
            passed += 1;
        } else {
            println!("  [FAIL] reference slash: {:?}", result);
            failed += 1;
        }
    }

    // u64::MAX deposit followed by any further deposit overflows
    {
        let provider = actor(3);
        let mut ledger = SimulatedLedger::new(OWNER);
        let first = ledger.deposit(&provider, provider, u64::MAX, u64::MAX);
        let second = ledger.deposit(&provider, provider, 1, 1);
        if first.is_err() || second != Err(LedgerError::ArithmeticOverflow) {
            println!("  [FAIL] u64::MAX deposit: {:?} then {:?}", first, second);
            failed += 1;
        } else {
            passed += 1;
        }
    }

    // Zero base collateral locks and slashes nothing
    {
        let provider = actor(4);
        let task_id = TaskId::from_seed(0);
        let mut ledger = SimulatedLedger::new(OWNER);
        let locked = ledger.lock_collateral(&OWNER, provider, task_id);
        let slashed = ledger.slash_collateral(&OWNER, task_id);
        match (locked, slashed) {
            (Ok(record), Ok(receipt)) if record.collateral == 0 && receipt.penalty == 0 => {
                passed += 1
            }
            other => {
                println!("  [FAIL] zero base collateral: {:?}", other);
                failed += 1;
            }
        }
    }

    // Raising the base after a lock makes the slash inconsistent, not lossy
    {
        let provider = actor(5);
        let task_id = TaskId::from_seed(1);
        let outcome = (|| -> Result<_, LedgerError> {
            let mut ledger = SimulatedLedger::with_params(OWNER, LedgerParams::with_base_collateral(10))?;
            ledger.deposit(&provider, provider, 1_000, 1_000)?;
            ledger.lock_collateral(&OWNER, provider, task_id)?;
            ledger.set_base_collateral(&OWNER, 100)?;
            Ok(ledger.slash_collateral(&OWNER, task_id))
        })();
        if outcome != Ok(Err(LedgerError::InvalidState)) {
            println!("  [FAIL] slash after base increase: {:?}", outcome);
            failed += 1;
        } else {
            passed += 1;
        }
    }

    println!("  edge_cases: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_concurrency_tests(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    for i in 0..iterations {
        let provider = actor(3 + (i % 3) as u8);
        let deposit = 1_000 + (i as u64 * 37) % 1_000;
        let requests: Vec<u64> = (0..(i % 8) + 2).map(|j| 100 + (j as u64 * 53) % 400).collect();

        let mut ledger = SimulatedLedger::new(OWNER);
        if ledger.deposit(&provider, provider, deposit, deposit).is_err() {
            failed += 1;
            continue;
        }

        let (_, results) = simulate_concurrent_withdrawals(ledger, provider, &requests);
        match results.iter().find(|r| r.is_invariant_violation()) {
            Some(violation) => {
                println!("  [FAIL] concurrent withdrawals {}: {:?}", i, violation);
                failed += 1;
            }
            None => passed += 1,
        }
    }

    println!("  concurrency: {} passed, {} failed", passed, failed);
    (passed, failed)
}
