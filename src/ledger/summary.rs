// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{FinancialRecord, RecordCategory, Transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub total_credit: Decimal,
    pub total_debit: Decimal,
    pub total_balance: Decimal,
    pub entry_count: usize,
}

impl Add for ProjectSummary {
    type Output = ProjectSummary;

    fn add(self, rhs: ProjectSummary) -> ProjectSummary {
        let total_credit = self.total_credit + rhs.total_credit;
        let total_debit = self.total_debit + rhs.total_debit;
        ProjectSummary {
            total_credit,
            total_debit,
            total_balance: total_credit - total_debit,
            entry_count: self.entry_count + rhs.entry_count,
        }
    }
}

pub fn summarize<'a, I>(transactions: I) -> ProjectSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (total_credit, total_debit, entry_count) = transactions.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO, 0usize),
        |(c, d, n), t| (c + t.credit, d + t.debit, n + 1),
    );
    ProjectSummary {
        total_credit,
        total_debit,
        total_balance: total_credit - total_debit,
        entry_count,
    }
}

/// Sorted unique categories, the choices offered by the report's category filter.
pub fn distinct_categories<'a, I>(transactions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .map(|t| t.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub record_count: usize,
    pub total_amount: Decimal,
    /// Sum of the positive amounts.
    pub total_credit: Decimal,
    /// Sum of the magnitudes of the negative amounts.
    pub total_debit: Decimal,
    pub total_balance: Decimal,
}

pub fn summarize_records<'a, I>(records: I) -> RecordSummary
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    let mut s = RecordSummary::default();
    for r in records {
        s.record_count += 1;
        s.total_amount += r.total_amount;
        if r.total_amount.is_sign_positive() {
            s.total_credit += r.total_amount;
        } else {
            s.total_debit += r.total_amount.abs();
        }
    }
    s.total_balance = s.total_credit - s.total_debit;
    s
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectCosts {
    pub contractor_cost: Decimal,
    pub material_cost: Decimal,
}

impl ProjectCosts {
    pub fn total_cost(&self) -> Decimal {
        self.contractor_cost + self.material_cost
    }
}

/// Contractor records count as contractor cost; vendor and supplier records
/// count as material cost.
pub fn project_costs<'a, I>(records: I) -> ProjectCosts
where
    I: IntoIterator<Item = &'a FinancialRecord>,
{
    records
        .into_iter()
        .fold(ProjectCosts::default(), |mut acc, r| {
            match r.category {
                RecordCategory::Contractor => acc.contractor_cost += r.total_amount,
                RecordCategory::Vendor | RecordCategory::Supplier => {
                    acc.material_cost += r.total_amount
                }
            }
            acc
        })
}
