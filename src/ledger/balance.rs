// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Running balances over a project ledger.
//!
//! Ledger order is `(date, id)` ascending. Ids come from the store's
//! insertion sequence, so entries on the same day fold in the order they
//! were recorded.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::Transaction;

pub trait Entry {
    fn credit(&self) -> Decimal;
    fn debit(&self) -> Decimal;

    fn net(&self) -> Decimal {
        self.credit() - self.debit()
    }
}

impl Entry for Transaction {
    fn credit(&self) -> Decimal {
        self.credit
    }

    fn debit(&self) -> Decimal {
        self.debit
    }
}

impl Entry for (Decimal, Decimal) {
    fn credit(&self) -> Decimal {
        self.0
    }

    fn debit(&self) -> Decimal {
        self.1
    }
}

impl<E: Entry + ?Sized> Entry for &E {
    fn credit(&self) -> Decimal {
        (**self).credit()
    }

    fn debit(&self) -> Decimal {
        (**self).debit()
    }
}

/// Folds `entries` in the given order: each balance is the previous one plus
/// this entry's credit minus its debit, starting from zero.
pub fn running_balances<E: Entry>(entries: &[E]) -> Vec<Decimal> {
    entries
        .iter()
        .scan(Decimal::ZERO, |acc, e| {
            *acc += e.net();
            Some(*acc)
        })
        .collect()
}

pub fn sort_ledger(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerRow {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub running_balance: Decimal,
}

/// Orders the transactions into ledger order and pairs each with its
/// recomputed running balance.
pub fn ledger_rows(mut transactions: Vec<Transaction>) -> Vec<LedgerRow> {
    sort_ledger(&mut transactions);
    let balances = running_balances(&transactions);
    transactions
        .into_iter()
        .zip(balances)
        .map(|(transaction, running_balance)| LedgerRow {
            transaction,
            running_balance,
        })
        .collect()
}

/// Balance a new entry dated `date` would carry once appended after every
/// existing entry dated on or before it.
pub fn balance_after(
    existing: &[Transaction],
    date: NaiveDate,
    credit: Decimal,
    debit: Decimal,
) -> Result<Decimal, LedgerError> {
    existing
        .iter()
        .filter(|t| t.date <= date)
        .map(|t| (t.credit, t.debit))
        .chain(std::iter::once((credit, debit)))
        .try_fold(Decimal::ZERO, |acc, (c, d)| {
            acc.checked_add(c)?.checked_sub(d)
        })
        .ok_or(LedgerError::AmountOverflow {
            field: "balance",
            max: Decimal::MAX,
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleBalance {
    pub id: i64,
    pub date: NaiveDate,
    pub stored: Decimal,
    pub expected: Decimal,
}

/// Entries whose stored balance snapshot no longer matches the ledger.
pub fn stale_balances(transactions: Vec<Transaction>) -> Vec<StaleBalance> {
    ledger_rows(transactions)
        .into_iter()
        .filter(|row| row.transaction.balance != row.running_balance)
        .map(|row| StaleBalance {
            id: row.transaction.id,
            date: row.transaction.date,
            stored: row.transaction.balance,
            expected: row.running_balance,
        })
        .collect()
}
