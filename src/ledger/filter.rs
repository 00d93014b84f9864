// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Declarative record filtering.
//!
//! A [`Criteria`] is a conjunction of [`Criterion`] values, each bound to one
//! field of the record type through a plain function pointer. Criteria built
//! from user input are lenient: blank inputs are skipped and inputs that do
//! not parse are logged and skipped, so a typo never hides every row.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{FinancialRecord, RecordCategory, Transaction};

pub enum Criterion<T> {
    DateRange {
        field: fn(&T) -> NaiveDate,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    DecimalRange {
        field: fn(&T) -> Decimal,
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    /// Case-insensitive containment. `needle` is stored lowercased.
    Substring { field: fn(&T) -> &str, needle: String },
    Exact { field: fn(&T) -> &str, value: String },
    ExactIgnoreCase { field: fn(&T) -> &str, value: String },
}

impl<T> Criterion<T> {
    pub fn matches(&self, item: &T) -> bool {
        match self {
            Criterion::DateRange { field, from, to } => within(field(item), *from, *to),
            Criterion::DecimalRange { field, min, max } => within(field(item), *min, *max),
            Criterion::Substring { field, needle } => {
                field(item).to_lowercase().contains(needle.as_str())
            }
            Criterion::Exact { field, value } => field(item) == value,
            Criterion::ExactIgnoreCase { field, value } => {
                field(item).to_lowercase() == value.to_lowercase()
            }
        }
    }
}

fn within<V: PartialOrd>(value: V, min: Option<V>, max: Option<V>) -> bool {
    if let Some(min) = min {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max {
        if value > max {
            return false;
        }
    }
    true
}

pub struct Criteria<T> {
    items: Vec<Criterion<T>>,
}

impl<T> Default for Criteria<T> {
    fn default() -> Self {
        Criteria { items: Vec::new() }
    }
}

impl<T> Criteria<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, criterion: Criterion<T>) -> Self {
        self.items.push(criterion);
        self
    }

    pub fn date_range(
        self,
        field: fn(&T) -> NaiveDate,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        if from.is_none() && to.is_none() {
            return self;
        }
        self.push(Criterion::DateRange { field, from, to })
    }

    pub fn decimal_range(
        self,
        field: fn(&T) -> Decimal,
        min: Option<Decimal>,
        max: Option<Decimal>,
    ) -> Self {
        if min.is_none() && max.is_none() {
            return self;
        }
        self.push(Criterion::DecimalRange { field, min, max })
    }

    pub fn substring(self, field: fn(&T) -> &str, needle: &str) -> Self {
        let needle = needle.trim();
        if needle.is_empty() {
            return self;
        }
        self.push(Criterion::Substring {
            field,
            needle: needle.to_lowercase(),
        })
    }

    pub fn exact(self, field: fn(&T) -> &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.push(Criterion::Exact {
                field,
                value: v.to_string(),
            }),
            _ => self,
        }
    }

    pub fn exact_ignore_case(self, field: fn(&T) -> &str, value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => self.push(Criterion::ExactIgnoreCase {
                field,
                value: v.to_string(),
            }),
            _ => self,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn matches(&self, item: &T) -> bool {
        self.items.iter().all(|c| c.matches(item))
    }
}

/// Returns the items satisfying every criterion, in their original order.
pub fn apply<'a, T>(items: &'a [T], criteria: &Criteria<T>) -> Vec<&'a T> {
    let out: Vec<&T> = items.iter().filter(|i| criteria.matches(i)).collect();
    tracing::debug!(
        criteria = criteria.len(),
        input = items.len(),
        matched = out.len(),
        "applied filter"
    );
    out
}

/// Parses a numeric bound, treating blank or malformed input as unset.
pub fn lenient_decimal(field: &'static str, raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        Ok(d) => Some(d),
        Err(_) => {
            ignore(LedgerError::InvalidCriterion {
                field,
                value: raw.to_string(),
            });
            None
        }
    }
}

/// Parses a `YYYY-MM-DD` bound, treating blank or malformed input as unset.
pub fn lenient_date(field: &'static str, raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            ignore(LedgerError::InvalidCriterion {
                field,
                value: raw.to_string(),
            });
            None
        }
    }
}

fn ignore(err: LedgerError) {
    tracing::warn!(error = %err, "ignoring filter criterion");
}

fn tx_date(t: &Transaction) -> NaiveDate {
    t.date
}
fn tx_notes(t: &Transaction) -> &str {
    &t.notes
}
fn tx_category(t: &Transaction) -> &str {
    &t.category
}
fn tx_credit(t: &Transaction) -> Decimal {
    t.credit
}
fn tx_debit(t: &Transaction) -> Decimal {
    t.debit
}

/// Raw transaction filter inputs, as typed into a report form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionFilter {
    /// A single day; combined with `date_from`/`date_to` when both are given.
    pub date: String,
    pub date_from: String,
    pub date_to: String,
    pub notes: String,
    /// Compared case-insensitively; `all` means no constraint.
    pub category: String,
    pub credit_min: String,
    pub credit_max: String,
    pub debit_min: String,
    pub debit_max: String,
}

impl TransactionFilter {
    pub fn criteria(&self) -> Criteria<Transaction> {
        let day = lenient_date("date", &self.date);
        let category = self.category.trim();
        let category = (!category.eq_ignore_ascii_case("all")).then_some(category);

        Criteria::new()
            .date_range(tx_date, day, day)
            .date_range(
                tx_date,
                lenient_date("date_from", &self.date_from),
                lenient_date("date_to", &self.date_to),
            )
            .substring(tx_notes, &self.notes)
            .exact_ignore_case(tx_category, category)
            .decimal_range(
                tx_credit,
                lenient_decimal("credit_min", &self.credit_min),
                lenient_decimal("credit_max", &self.credit_max),
            )
            .decimal_range(
                tx_debit,
                lenient_decimal("debit_min", &self.debit_min),
                lenient_decimal("debit_max", &self.debit_max),
            )
    }

    pub fn is_active(&self) -> bool {
        !self.criteria().is_empty()
    }
}

fn rec_date(r: &FinancialRecord) -> NaiveDate {
    r.date
}
fn rec_description(r: &FinancialRecord) -> &str {
    &r.description
}
fn rec_category(r: &FinancialRecord) -> &str {
    r.category.as_str()
}
fn rec_trade(r: &FinancialRecord) -> &str {
    &r.trade
}
fn rec_unit(r: &FinancialRecord) -> &str {
    &r.unit
}
fn rec_unit_rate_price(r: &FinancialRecord) -> Decimal {
    r.unit_rate_price
}
fn rec_qty(r: &FinancialRecord) -> Decimal {
    r.qty
}
fn rec_total_amount(r: &FinancialRecord) -> Decimal {
    r.total_amount
}

/// Raw financial record filter inputs, one per column of the records table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub date_from: String,
    pub date_to: String,
    pub description: String,
    pub category: String,
    pub trade: String,
    pub unit: String,
    pub unit_rate_price_min: String,
    pub unit_rate_price_max: String,
    pub qty_min: String,
    pub qty_max: String,
    pub total_amount_min: String,
    pub total_amount_max: String,
}

impl RecordFilter {
    pub fn criteria(&self) -> Criteria<FinancialRecord> {
        let category = match self.category.trim() {
            "" => None,
            raw => match raw.parse::<RecordCategory>() {
                Ok(c) => Some(c.as_str()),
                Err(_) => {
                    ignore(LedgerError::InvalidCriterion {
                        field: "category",
                        value: raw.to_string(),
                    });
                    None
                }
            },
        };

        Criteria::new()
            .date_range(
                rec_date,
                lenient_date("date_from", &self.date_from),
                lenient_date("date_to", &self.date_to),
            )
            .substring(rec_description, &self.description)
            .exact(rec_category, category)
            .substring(rec_trade, &self.trade)
            .substring(rec_unit, &self.unit)
            .decimal_range(
                rec_unit_rate_price,
                lenient_decimal("unit_rate_price_min", &self.unit_rate_price_min),
                lenient_decimal("unit_rate_price_max", &self.unit_rate_price_max),
            )
            .decimal_range(
                rec_qty,
                lenient_decimal("qty_min", &self.qty_min),
                lenient_decimal("qty_max", &self.qty_max),
            )
            .decimal_range(
                rec_total_amount,
                lenient_decimal("total_amount_min", &self.total_amount_min),
                lenient_decimal("total_amount_max", &self.total_amount_max),
            )
    }

    /// Number of inputs that hold any text, valid or not.
    pub fn active_count(&self) -> usize {
        [
            &self.date_from,
            &self.date_to,
            &self.description,
            &self.category,
            &self.trade,
            &self.unit,
            &self.unit_rate_price_min,
            &self.unit_rate_price_max,
            &self.qty_min,
            &self.qty_max,
            &self.total_amount_min,
            &self.total_amount_max,
        ]
        .iter()
        .filter(|v| !v.trim().is_empty())
        .count()
    }
}
