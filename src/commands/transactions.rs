// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{ensure_amount, LedgerError};
use crate::ledger::balance::{balance_after, ledger_rows};
use crate::ledger::{apply, TransactionFilter};
use crate::models::Transaction;
use crate::utils::{
    currency_label, decimal_column, fmt_money, id_for_project, maybe_print_json,
    order_from_args, page_from_args, parse_amount, parse_date, pretty_table, Page, SortOrder,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete(conn, id)?;
            println!("Removed transaction {} (run `tx rebalance` to repair later balances)", id);
        }
        Some(("rebalance", sub)) => {
            let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
            let n = rebalance(conn, project_id)?;
            println!("Rebalanced project {}: {} balance(s) rewritten", project_id, n);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub project_id: i64,
    pub date: NaiveDate,
    pub notes: String,
    pub category: String,
    pub credit: Decimal,
    pub debit: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub credit: Option<Decimal>,
    pub debit: Option<Decimal>,
}

const COLUMNS: &str = "id, project_id, date, notes, category, credit, debit, balance";

fn from_row(r: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        project_id: r.get(1)?,
        date: r.get(2)?,
        notes: r.get(3)?,
        category: r.get(4)?,
        credit: decimal_column(r, 5)?,
        debit: decimal_column(r, 6)?,
        balance: decimal_column(r, 7)?,
    })
}

fn ensure_project(conn: &Connection, project_id: i64) -> Result<()> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM projects WHERE id=?1",
            params![project_id],
            |r| r.get(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(LedgerError::ProjectNotFound(project_id).into()),
    }
}

/// Stores a ledger entry. Its balance snapshot is the project's running
/// balance including this entry; later-dated entries are left untouched.
pub fn insert(conn: &Connection, t: &NewTransaction) -> Result<Transaction> {
    ensure_amount("credit", t.credit)?;
    ensure_amount("debit", t.debit)?;
    ensure_project(conn, t.project_id)?;

    let existing = list_for_project(conn, t.project_id)?;
    let balance = balance_after(&existing, t.date, t.credit, t.debit)?;
    if existing.iter().any(|e| e.date > t.date) {
        tracing::warn!(
            project_id = t.project_id,
            date = %t.date,
            "back-dated entry; later balances are stale until rebalanced"
        );
    }

    conn.execute(
        "INSERT INTO transactions(project_id, date, notes, category, credit, debit, balance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            t.project_id,
            t.date,
            t.notes.trim(),
            t.category.trim(),
            t.credit.to_string(),
            t.debit.to_string(),
            balance.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, project_id = t.project_id, %balance, "recorded transaction");
    get(conn, id)
}

pub fn get(conn: &Connection, id: i64) -> Result<Transaction> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", COLUMNS);
    conn.query_row(&sql, params![id], from_row)
        .optional()?
        .ok_or_else(|| LedgerError::TransactionNotFound(id).into())
}

/// Every entry of a project in ledger order.
pub fn list_for_project(conn: &Connection, project_id: i64) -> Result<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE project_id=?1 ORDER BY date, id",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![project_id], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    tracing::debug!(project_id, count = out.len(), "loaded transactions");
    Ok(out)
}

/// Filtered, ordered and paged listing for one project.
pub fn query(
    conn: &Connection,
    project_id: i64,
    filter: &TransactionFilter,
    order: SortOrder,
    page: Page,
) -> Result<Vec<Transaction>> {
    let all = list_for_project(conn, project_id)?;
    let criteria = filter.criteria();
    let mut matched: Vec<Transaction> = apply(&all, &criteria).into_iter().cloned().collect();
    if order == SortOrder::Desc {
        matched.reverse();
    }
    Ok(page.apply(matched))
}

/// Every distinct category across all projects.
pub fn all_categories(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT DISTINCT category FROM transactions ORDER BY category")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Applies the patch. Stored balances are not repaired; see [`rebalance`].
pub fn update(conn: &Connection, id: i64, patch: &TransactionPatch) -> Result<Transaction> {
    let mut t = get(conn, id)?;
    if let Some(d) = patch.date {
        t.date = d;
    }
    if let Some(ref n) = patch.notes {
        t.notes = n.trim().to_string();
    }
    if let Some(ref c) = patch.category {
        t.category = c.trim().to_string();
    }
    if let Some(v) = patch.credit {
        t.credit = ensure_amount("credit", v)?;
    }
    if let Some(v) = patch.debit {
        t.debit = ensure_amount("debit", v)?;
    }
    conn.execute(
        "UPDATE transactions SET date=?1, notes=?2, category=?3, credit=?4, debit=?5,
         updated_at=datetime('now') WHERE id=?6",
        params![
            t.date,
            t.notes,
            t.category,
            t.credit.to_string(),
            t.debit.to_string(),
            id
        ],
    )?;
    tracing::info!(id, "updated transaction");
    Ok(t)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::TransactionNotFound(id).into());
    }
    tracing::info!(id, "deleted transaction");
    Ok(())
}

/// Rewrites every stale balance snapshot of the project from its credits and
/// debits. Returns the number of rows changed.
pub fn rebalance(conn: &Connection, project_id: i64) -> Result<usize> {
    ensure_project(conn, project_id)?;
    let rows = ledger_rows(list_for_project(conn, project_id)?);
    let mut stmt = conn.prepare("UPDATE transactions SET balance=?1 WHERE id=?2")?;
    let mut changed = 0;
    for row in rows
        .iter()
        .filter(|r| r.transaction.balance != r.running_balance)
    {
        stmt.execute(params![row.running_balance.to_string(), row.transaction.id])?;
        changed += 1;
    }
    tracing::info!(project_id, changed, "rebalanced ledger");
    Ok(changed)
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> TransactionFilter {
    let s = |key: &str| sub.get_one::<String>(key).cloned().unwrap_or_default();
    TransactionFilter {
        date: s("date"),
        date_from: s("from"),
        date_to: s("to"),
        notes: s("notes"),
        category: s("category"),
        credit_min: s("credit_min"),
        credit_max: s("credit_max"),
        debit_min: s("debit_min"),
        debit_max: s("debit_max"),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let amount = |key: &'static str| -> Result<Decimal> {
        match sub.get_one::<String>(key) {
            Some(s) => parse_amount(key, s),
            None => Ok(Decimal::ZERO),
        }
    };
    let t = NewTransaction {
        project_id,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        notes: sub.get_one::<String>("notes").cloned().unwrap_or_default(),
        category: sub.get_one::<String>("category").cloned().unwrap_or_default(),
        credit: amount("credit")?,
        debit: amount("debit")?,
    };
    let stored = insert(conn, &t)?;
    let label = currency_label(conn)?;
    println!(
        "Recorded transaction {} on {} (balance {})",
        stored.id,
        stored.date,
        fmt_money(&stored.balance, &label)
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = TransactionPatch {
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        notes: sub.get_one::<String>("notes").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        credit: sub
            .get_one::<String>("credit")
            .map(|s| parse_amount("credit", s))
            .transpose()?,
        debit: sub
            .get_one::<String>("debit")
            .map(|s| parse_amount("debit", s))
            .transpose()?,
    };
    let t = update(conn, id, &patch)?;
    println!(
        "Updated transaction {} (run `tx rebalance --project {}` to repair balances)",
        t.id, t.project_id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub notes: String,
    pub category: String,
    pub credit: String,
    pub debit: String,
    pub balance: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            notes: t.notes.clone(),
            category: t.category.clone(),
            credit: format!("{:.3}", t.credit),
            debit: format!("{:.3}", t.debit),
            balance: format!("{:.3}", t.balance),
        }
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let filter = filter_from_args(sub);
    let txs = query(
        conn,
        project_id,
        &filter,
        order_from_args(sub)?,
        page_from_args(sub),
    )?;
    Ok(txs.iter().map(TransactionRow::from).collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.notes.clone(),
                    r.category.clone(),
                    r.credit.clone(),
                    r.debit.clone(),
                    r.balance.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Notes", "Category", "Credit", "Debit", "Balance"],
                rows,
            )
        );
    }
    Ok(())
}
