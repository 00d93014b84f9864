// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger and aggregation engine.
//!
//! Everything here is a pure function over a snapshot already loaded from
//! the store: filtering, running balances, summaries and dashboard counts.
//! Amounts are `Decimal` throughout.

pub mod balance;
pub mod classify;
pub mod filter;
pub mod stats;
pub mod summary;

pub use balance::{LedgerRow, ledger_rows, running_balances, sort_ledger};
pub use classify::{CategoryClass, KeywordRule, KeywordTable};
pub use filter::{Criteria, Criterion, RecordFilter, TransactionFilter, apply};
pub use stats::{DashboardStats, dashboard_stats};
pub use summary::{
    ProjectCosts, ProjectSummary, RecordSummary, distinct_categories, project_costs, summarize,
    summarize_records,
};
