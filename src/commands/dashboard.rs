// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{keywords, projects, transactions};
use crate::ledger::{dashboard_stats, DashboardStats};
use crate::utils::{currency_label, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let stats = stats(conn)?;
    if !maybe_print_json(m.get_flag("json"), false, &stats)? {
        let label = currency_label(conn)?;
        println!(
            "{}",
            pretty_table(
                &["Total Projects", "Contractors", "Suppliers", "Total Spent"],
                vec![vec![
                    stats.total_projects.to_string(),
                    stats.total_contractors.to_string(),
                    stats.total_suppliers.to_string(),
                    fmt_money(&stats.total_spent, &label),
                ]],
            )
        );
    }
    Ok(())
}

pub fn stats(conn: &Connection) -> Result<DashboardStats> {
    let projects = projects::list_all(conn)?;
    let categories = transactions::all_categories(conn)?;
    let table = keywords::load_table(conn)?;
    Ok(dashboard_stats(
        &projects,
        categories.iter().map(String::as_str),
        &table,
    ))
}
