// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use super::classify::{CategoryClass, KeywordTable};
use crate::models::Project;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_contractors: usize,
    pub total_suppliers: usize,
    pub total_spent: Decimal,
}

/// Reduces every project and every ledger category into dashboard counts.
///
/// Contractor and supplier counts are taken over distinct category values,
/// so a category repeated across many transactions counts once.
pub fn dashboard_stats<'p, 'c, P, C>(
    projects: P,
    categories: C,
    table: &KeywordTable,
) -> DashboardStats
where
    P: IntoIterator<Item = &'p Project>,
    C: IntoIterator<Item = &'c str>,
{
    let (total_projects, total_spent) = projects
        .into_iter()
        .fold((0usize, Decimal::ZERO), |(n, spent), p| (n + 1, spent + p.total_cost()));

    let distinct: BTreeSet<&str> = categories.into_iter().collect();
    let count = |class: CategoryClass| distinct.iter().filter(|c| table.is(class, c)).count();

    let stats = DashboardStats {
        total_projects,
        total_contractors: count(CategoryClass::Contractor),
        total_suppliers: count(CategoryClass::Supplier),
        total_spent,
    };
    tracing::debug!(
        keyword_version = table.version,
        categories = distinct.len(),
        ?stats,
        "computed dashboard stats"
    );
    stats
}
