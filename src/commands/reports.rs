// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{keywords, projects, transactions};
use crate::ledger::{
    apply, distinct_categories, ledger_rows, summarize, CategoryClass, LedgerRow,
    ProjectSummary, TransactionFilter,
};
use crate::utils::{currency_label, fmt_money, id_for_project, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("ledger", sub)) => ledger(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Running-balance ledger of a project. Balances are folded over the whole
/// ledger first, so filtering hides rows without changing their balances.
pub fn ledger_report(
    conn: &Connection,
    project_id: i64,
    filter: &TransactionFilter,
) -> Result<Vec<LedgerRow>> {
    let rows = ledger_rows(transactions::list_for_project(conn, project_id)?);
    let criteria = filter.criteria();
    Ok(rows
        .into_iter()
        .filter(|r| criteria.matches(&r.transaction))
        .collect())
}

#[derive(Debug, Serialize)]
pub struct ProjectReport {
    pub project_id: i64,
    pub project_name: String,
    /// Whether any filter criterion applied to the summary.
    pub filtered: bool,
    pub summary: ProjectSummary,
    pub categories: Vec<String>,
}

/// Summary of a project's (optionally filtered) transactions. The category
/// list always covers the full ledger so every choice stays selectable.
pub fn project_report(
    conn: &Connection,
    project_id: i64,
    filter: &TransactionFilter,
) -> Result<ProjectReport> {
    let project = projects::get(conn, project_id)?;
    let all = transactions::list_for_project(conn, project_id)?;
    let filtered = apply(&all, &filter.criteria());
    Ok(ProjectReport {
        project_id,
        project_name: project.name,
        filtered: filter.is_active(),
        summary: summarize(filtered),
        categories: distinct_categories(&all),
    })
}

fn ledger(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let rows = ledger_report(conn, project_id, &transactions::filter_from_args(sub))?;
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                let t = &r.transaction;
                vec![
                    t.date.to_string(),
                    t.notes.clone(),
                    t.category.clone(),
                    format!("{:.3}", t.credit),
                    format!("{:.3}", t.debit),
                    format!("{:.3}", r.running_balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Notes", "Category", "Credit", "Debit", "Balance"],
                data
            )
        );
    }
    Ok(())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let report = project_report(conn, project_id, &transactions::filter_from_args(sub))?;
    if !maybe_print_json(sub.get_flag("json"), false, &report)? {
        let label = currency_label(conn)?;
        let s = &report.summary;
        if report.filtered {
            println!("{} (filtered)", report.project_name);
        } else {
            println!("{}", report.project_name);
        }
        println!(
            "{}",
            pretty_table(
                &["Total Credit", "Total Debit", "Total Balance", "Total Entries"],
                vec![vec![
                    fmt_money(&s.total_credit, &label),
                    fmt_money(&s.total_debit, &label),
                    fmt_money(&s.total_balance, &label),
                    s.entry_count.to_string(),
                ]],
            )
        );
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub classes: Vec<CategoryClass>,
}

/// Distinct categories of a project with the dashboard classes each one
/// falls into under the current keyword table.
pub fn category_report(conn: &Connection, project_id: i64) -> Result<Vec<CategoryRow>> {
    let table = keywords::load_table(conn)?;
    let all = transactions::list_for_project(conn, project_id)?;
    Ok(distinct_categories(&all)
        .into_iter()
        .map(|category| CategoryRow {
            classes: table.classify(&category),
            category,
        })
        .collect())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let rows = category_report(conn, project_id)?;
    if !maybe_print_json(sub.get_flag("json"), false, &rows)? {
        let data = rows
            .into_iter()
            .map(|r| {
                let classes: Vec<String> = r.classes.iter().map(|c| c.to_string()).collect();
                vec![r.category, classes.join(", ")]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Classes"], data));
    }
    Ok(())
}
