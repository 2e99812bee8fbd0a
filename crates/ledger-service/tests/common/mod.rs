//! Shared fixtures for service tests.

use chrono::NaiveDate;
use ledger_core::{CategoryId, Money, NewTransaction, Principal, PrincipalId, Role, TransactionType};
use ledger_repository::{InMemoryLedger, TransactionRepository};
use std::sync::Arc;

pub fn user(id: i64) -> Principal {
    Principal::new(PrincipalId(id), Role::User)
}

pub fn admin(id: i64) -> Principal {
    Principal::new(PrincipalId(id), Role::Admin)
}

pub fn reader(id: i64) -> Principal {
    Principal::new(PrincipalId(id), Role::ReadOnly)
}

pub fn entry(
    owner: i64,
    major: i64,
    kind: TransactionType,
    category: Option<CategoryId>,
    (year, month, day): (i32, u32, u32),
) -> NewTransaction {
    NewTransaction {
        user_id: PrincipalId(owner),
        amount: Money::from_major(major),
        transaction_type: kind,
        category_id: category,
        description: None,
        transaction_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
    }
}

/// Two users with March 2024 activity; user 7 has the canonical rent scenario.
pub async fn seeded_ledger() -> Arc<InMemoryLedger> {
    let ledger = Arc::new(InMemoryLedger::new());
    let rent = ledger.add_category("Rent").await;
    let food = ledger.add_category("Food").await;

    for tx in [
        entry(7, 5000, TransactionType::Income, None, (2024, 3, 1)),
        entry(7, 1200, TransactionType::Expense, Some(rent), (2024, 3, 5)),
        entry(8, 3000, TransactionType::Income, None, (2024, 3, 2)),
        entry(8, 800, TransactionType::Expense, Some(rent), (2024, 3, 3)),
        entry(8, 150, TransactionType::Expense, Some(food), (2024, 4, 9)),
        entry(8, 40, TransactionType::Expense, None, (2023, 12, 30)),
    ] {
        ledger.insert(tx).await.unwrap();
    }
    ledger
}
