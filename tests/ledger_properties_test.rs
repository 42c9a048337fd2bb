//! Behavioural tests for the ledger core through its public API.
//!
//! Covers amount rules, debit/credit accounting, lockout, withdrawal caps,
//! the receipt fee contract and transfers.

use atm_ledger::{
    AccountService, AmountError, AmountValidator, AtmError, BalanceOverflow, DayEpoch, Directory,
    GateState, InsufficientFunds, Ledger, Limits, Pin, ReceiptOutcome, SecurityError, SecurityGate, User,
    WithdrawalError, WithdrawalPolicy, WithdrawalWindow,
};

fn user(name: &str, balance: u64) -> User {
    User::new(name, Pin::parse("1234", 4).unwrap(), balance, &Limits::default())
}

// ==================== AMOUNT RULES ====================

#[test]
fn test_every_amount_below_minimum_is_rejected() {
    let validator = AmountValidator::default();
    for amount in 0..500 {
        assert_eq!(
            validator.validate(amount),
            Err(AmountError::BelowMinimum { minimum: 500 })
        );
    }
}

#[test]
fn test_non_multiples_above_minimum_are_rejected() {
    let validator = AmountValidator::default();
    for amount in (500..3_000).filter(|a| a % 500 != 0) {
        assert_eq!(
            validator.validate(amount),
            Err(AmountError::NotAMultiple { step: 500 })
        );
    }
}

#[test]
fn test_multiples_of_500_are_accepted() {
    let validator = AmountValidator::default();
    for amount in (1..=200).map(|n| n * 500) {
        assert!(validator.validate(amount).is_ok());
    }
}

// ==================== LEDGER ====================

#[test]
fn test_debit_fails_iff_amount_exceeds_balance() {
    for (balance, amount) in [(0, 1), (999, 1_000), (1_000, 1_000), (1_000, 0), (5, 3)] {
        let mut ledger = Ledger::new(balance);
        let result = ledger.debit(amount, "Withdrawal");

        if amount > balance {
            assert_eq!(
                result,
                Err(InsufficientFunds {
                    requested: amount,
                    available: balance
                })
            );
            assert_eq!(ledger.balance(), balance);
            assert!(ledger.history().is_empty());
        } else {
            assert!(result.is_ok());
            assert_eq!(ledger.balance(), balance - amount);
            assert_eq!(ledger.history().len(), 1);
            assert_eq!(ledger.history()[0].signed_amount(), -i128::from(amount));
        }
    }
}

#[test]
fn test_credit_is_inverse_of_debit() {
    let mut ledger = Ledger::new(7_000);
    ledger.credit(2_000, "Deposit").unwrap();
    assert_eq!(ledger.balance(), 9_000);
    ledger.debit(2_000, "Withdrawal").unwrap();
    assert_eq!(ledger.balance(), 7_000);

    let signed: Vec<_> = ledger.history().iter().map(|r| r.signed_amount()).collect();
    assert_eq!(signed, [2_000, -2_000]);
}

#[test]
fn test_credit_is_exact_near_the_limit() {
    let limit = u64::MAX;
    for (balance, amount) in [(limit - 500, 500), (limit - 1_000, 500), (0, limit)] {
        let mut ledger = Ledger::new(balance);
        ledger.credit(amount, "Deposit").unwrap();

        assert_eq!(ledger.balance(), balance + amount);
        assert_eq!(ledger.history()[0].signed_amount(), i128::from(amount));
    }

    let mut ledger = Ledger::new(limit - 499);
    assert_eq!(
        ledger.credit(500, "Deposit"),
        Err(BalanceOverflow {
            amount: 500,
            balance: limit - 499
        })
    );
    assert_eq!(ledger.balance(), limit - 499);
    assert!(ledger.history().is_empty());
}

#[test]
fn test_history_order_matches_operation_order() {
    let service = AccountService::default();
    let mut alice = user("alice", 10_000);
    let mut bob = user("bob", 0);

    service.deposit(alice.ledger_mut(), 500).unwrap();
    service.mobile_top_up(alice.ledger_mut(), "017", 1_000).unwrap();
    let _ = service.deposit(alice.ledger_mut(), 1); // rejected, no record
    service.transfer(&mut alice, &mut bob, 500).unwrap();
    service
        .withdraw(&mut alice, DayEpoch(0), 1_000, true)
        .unwrap();

    let lines: Vec<_> = alice
        .ledger()
        .history()
        .iter()
        .map(|r| r.to_string())
        .collect();
    assert_eq!(
        lines,
        [
            "+500 TAKA: Deposit",
            "-1000 TAKA: Mobile Top-up (017)",
            "-500 TAKA: Transfer to bob",
            "-1000 TAKA: Withdrawal",
            "-3 TAKA: Receipt Fee",
        ]
    );
    assert_eq!(alice.balance(), 7_997);
}

// ==================== SECURITY ====================

#[test]
fn test_three_consecutive_failures_lock() {
    let pin = Pin::parse("1722", 4).unwrap();
    let mut gate = SecurityGate::default();

    assert_eq!(
        gate.attempt("1", &pin),
        Err(SecurityError::InvalidPin { remaining: 2 })
    );
    assert_eq!(
        gate.attempt("2", &pin),
        Err(SecurityError::InvalidPin { remaining: 1 })
    );
    assert_eq!(gate.attempt("3", &pin), Err(SecurityError::LockedOut));
    assert_eq!(gate.state(), GateState::Locked);
}

#[test]
fn test_interleaved_success_prevents_lock() {
    let pin = Pin::parse("1722", 4).unwrap();
    let mut gate = SecurityGate::default();

    for _ in 0..5 {
        let _ = gate.attempt("0000", &pin);
        let _ = gate.attempt("0000", &pin);
        assert!(gate.attempt("1722", &pin).is_ok());
    }
    assert_eq!(gate.state(), GateState::Unlocked { attempts: 0 });
}

#[test]
fn test_attempts_while_locked_are_not_counted() {
    let pin = Pin::parse("1722", 4).unwrap();
    let mut gate = SecurityGate::new(2);
    let _ = gate.attempt("0000", &pin);
    let _ = gate.attempt("0000", &pin);

    for _ in 0..10 {
        assert_eq!(gate.attempt("0000", &pin), Err(SecurityError::AccountLocked));
    }
    assert_eq!(gate.state(), GateState::Locked);
}

// ==================== WITHDRAWAL ====================

#[test]
fn test_over_per_transaction_cap_with_plenty_of_funds() {
    let policy = WithdrawalPolicy::default();
    let mut ledger = Ledger::new(10_000_000);
    let mut window = WithdrawalWindow::default();

    assert_eq!(
        policy.withdraw(&mut ledger, &mut window, DayEpoch(0), 20_001),
        Err(AtmError::Withdrawal(
            WithdrawalError::ExceedsPerTransactionLimit { limit: 20_000 }
        ))
    );
}

#[test]
fn test_four_max_withdrawals_then_daily_cap() {
    let policy = WithdrawalPolicy::default();
    let mut ledger = Ledger::new(100_000);
    let mut window = WithdrawalWindow::default();
    let day = DayEpoch(7);

    for _ in 0..4 {
        policy.withdraw(&mut ledger, &mut window, day, 20_000).unwrap();
    }
    assert!(matches!(
        policy.withdraw(&mut ledger, &mut window, day, 500),
        Err(AtmError::Withdrawal(WithdrawalError::ExceedsDailyLimit { .. }))
    ));
    assert_eq!(ledger.balance(), 20_000);
}

#[test]
fn test_receipt_fee_paid_from_remaining_balance() {
    let service = AccountService::default();
    let mut alice = user("alice", 20_003);

    let outcome = service
        .withdraw(&mut alice, DayEpoch(0), 20_000, true)
        .unwrap();

    assert_eq!(outcome.receipt, ReceiptOutcome::Printed { fee: 3 });
    assert_eq!(alice.balance(), 0);
}

#[test]
fn test_unaffordable_receipt_does_not_roll_back_withdrawal() {
    let service = AccountService::default();
    let mut alice = user("alice", 20_000);

    let outcome = service
        .withdraw(&mut alice, DayEpoch(0), 20_000, true)
        .unwrap();

    assert_eq!(
        outcome.receipt,
        ReceiptOutcome::Declined(InsufficientFunds {
            requested: 3,
            available: 0
        })
    );
    assert_eq!(alice.balance(), 0);
    assert_eq!(alice.ledger().history().len(), 1);
    assert_eq!(alice.window().withdrawn_on(DayEpoch(0)), 20_000);
}

#[test]
fn test_custom_limits_flow_through_service() {
    let limits = Limits {
        max_per_transaction: 1_000,
        max_per_day: 2_000,
        receipt_fee: 7,
        ..Limits::default()
    };
    let service = AccountService::new(&limits);
    let mut alice = User::new("alice", Pin::parse("1234", 4).unwrap(), 10_000, &limits);

    assert!(service.withdraw(&mut alice, DayEpoch(0), 1_500, false).is_err());
    service.withdraw(&mut alice, DayEpoch(0), 1_000, true).unwrap();
    service.withdraw(&mut alice, DayEpoch(0), 1_000, false).unwrap();
    assert!(service.withdraw(&mut alice, DayEpoch(0), 500, false).is_err());
    assert_eq!(alice.balance(), 10_000 - 2_000 - 7);
}

// ==================== TRANSFER ====================

#[test]
fn test_transfer_through_directory() {
    let service = AccountService::default();
    let mut directory = Directory::new();
    directory.insert(user("alice", 50_000));
    directory.insert(user("bob", 60_000));

    let (alice, bob) = directory.pair_mut("alice", "bob").unwrap();
    let outcome = service.transfer(alice, bob, 1_000).unwrap();

    assert_eq!(outcome.source_balance, 49_000);
    assert_eq!(outcome.destination_balance, 61_000);
    assert_eq!(directory.get("alice").unwrap().ledger().history().len(), 1);
    assert_eq!(directory.get("bob").unwrap().ledger().history().len(), 1);
    assert!(directory.get("bob").unwrap().ledger().history()[0]
        .signed_amount()
        .is_positive());
}

#[test]
fn test_failed_transfer_changes_nothing() {
    let service = AccountService::default();
    let mut alice = user("alice", 999);
    let mut bob = user("bob", 60_000);

    assert!(service.transfer(&mut alice, &mut bob, 1_000).is_err());
    assert_eq!(alice.balance(), 999);
    assert_eq!(bob.balance(), 60_000);
    assert!(alice.ledger().history().is_empty());
    assert!(bob.ledger().history().is_empty());
}

#[test]
fn test_transfer_into_nearly_full_account_conserves_money() {
    let service = AccountService::default();
    let mut alice = user("alice", 50_000);
    let mut bob = user("bob", u64::MAX - 100);
    let total = u128::from(alice.balance()) + u128::from(bob.balance());

    assert!(matches!(
        service.transfer(&mut alice, &mut bob, 1_000),
        Err(AtmError::Overflow(_))
    ));
    assert_eq!(u128::from(alice.balance()) + u128::from(bob.balance()), total);

    let mut carol = user("carol", u64::MAX - 1_000);
    service.transfer(&mut alice, &mut carol, 1_000).unwrap();
    assert_eq!(carol.balance(), u64::MAX);
    assert_eq!(alice.balance(), 49_000);
}

#[test]
fn test_transfer_conserves_total_money() {
    let service = AccountService::default();
    let mut alice = user("alice", 30_000);
    let mut bob = user("bob", 10_000);

    for amount in [500, 5_000, 20_000, 10_000, 4_500] {
        let _ = service.transfer(&mut alice, &mut bob, amount);
        let _ = service.transfer(&mut bob, &mut alice, amount / 2);
        assert_eq!(alice.balance() + bob.balance(), 40_000);
    }
}
