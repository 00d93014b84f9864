// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Project {0} not found")]
    ProjectNotFound(i64),
    #[error("Transaction {0} not found")]
    TransactionNotFound(i64),
    #[error("Financial record {0} not found")]
    RecordNotFound(i64),
    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("Unknown record category '{0}' (use Contractor|Vendor|Supplier)")]
    UnknownRecordCategory(String),
    #[error("Unknown keyword class '{0}' (use contractor|supplier)")]
    UnknownKeywordClass(String),
    #[error("{field} exceeds the largest supported amount ({max})")]
    AmountOverflow { field: &'static str, max: Decimal },
    #[error("Invalid value '{value}' for filter {field}")]
    InvalidCriterion { field: &'static str, value: String },
}

/// Largest money or quantity value accepted at the store boundary. Sums of
/// any realistic number of bounded values stay far inside `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Rejects negative or oversized money and quantity inputs at the store boundary.
pub fn ensure_amount(field: &'static str, value: Decimal) -> Result<Decimal, LedgerError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(LedgerError::NegativeAmount { field, value })
    } else if value > MAX_AMOUNT {
        Err(LedgerError::AmountOverflow {
            field,
            max: MAX_AMOUNT,
        })
    } else {
        Ok(value)
    }
}
