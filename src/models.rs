// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, LedgerError, MAX_AMOUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub contractor_cost: Decimal,
    pub material_cost: Decimal,
    pub budget: Decimal,
}

impl Project {
    pub fn total_cost(&self) -> Decimal {
        self.contractor_cost + self.material_cost
    }

    /// Positive when the project is over budget.
    pub fn variance(&self) -> Decimal {
        self.total_cost() - self.budget
    }
}

/// Project as presented to callers, with the derived cost fields filled in.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub contractor_cost: Decimal,
    pub material_cost: Decimal,
    pub total_cost: Decimal,
    pub budget: Decimal,
    pub variance: Decimal,
}

impl From<&Project> for ProjectView {
    fn from(p: &Project) -> Self {
        ProjectView {
            id: p.id,
            name: p.name.clone(),
            location: p.location.clone(),
            description: p.description.clone(),
            contractor_cost: p.contractor_cost,
            material_cost: p.material_cost,
            total_cost: p.total_cost(),
            budget: p.budget,
            variance: p.variance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    pub notes: String,
    pub category: String,
    pub credit: Decimal,
    pub debit: Decimal,
    /// Running balance snapshot taken when the entry was stored.
    pub balance: Decimal,
}

impl Transaction {
    pub fn net(&self) -> Decimal {
        self.credit - self.debit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordCategory {
    Contractor,
    Vendor,
    Supplier,
}

impl RecordCategory {
    pub const ALL: [RecordCategory; 3] = [
        RecordCategory::Contractor,
        RecordCategory::Vendor,
        RecordCategory::Supplier,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordCategory::Contractor => "Contractor",
            RecordCategory::Vendor => "Vendor",
            RecordCategory::Supplier => "Supplier",
        }
    }
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RecordCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LedgerError::UnknownRecordCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub id: i64,
    pub project_id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub category: RecordCategory,
    pub trade: String,
    pub unit: String,
    pub unit_rate_price: Decimal,
    pub qty: Decimal,
    /// `unit_rate_price * qty`, fixed when the record was written.
    pub total_amount: Decimal,
}

impl FinancialRecord {
    pub fn expected_total(&self) -> Result<Decimal, LedgerError> {
        line_total(self.unit_rate_price, self.qty)
    }
}

/// `unit_rate_price * qty`, bounded like every other stored amount.
pub fn line_total(unit_rate_price: Decimal, qty: Decimal) -> Result<Decimal, LedgerError> {
    let total = unit_rate_price
        .checked_mul(qty)
        .ok_or(LedgerError::AmountOverflow {
            field: "total_amount",
            max: MAX_AMOUNT,
        })?;
    ensure_amount("total_amount", total)
}
