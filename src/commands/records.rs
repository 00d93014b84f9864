// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{ensure_amount, LedgerError};
use crate::ledger::{apply, summarize_records, RecordFilter, RecordSummary};
use crate::models::{line_total, FinancialRecord, RecordCategory};
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
            println!("Removed financial record {}", id);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewRecord {
    pub project_id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub category: RecordCategory,
    pub trade: String,
    pub unit: String,
    pub unit_rate_price: Decimal,
    pub qty: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<RecordCategory>,
    pub trade: Option<String>,
    pub unit: Option<String>,
    pub unit_rate_price: Option<Decimal>,
    pub qty: Option<Decimal>,
}

const COLUMNS: &str =
    "id, project_id, date, description, category, trade, unit, unit_rate_price, qty, total_amount";

fn from_row(r: &Row) -> rusqlite::Result<FinancialRecord> {
    let category: String = r.get(4)?;
    let category = category.parse::<RecordCategory>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(FinancialRecord {
        id: r.get(0)?,
        project_id: r.get(1)?,
        date: r.get(2)?,
        description: r.get(3)?,
        category,
        trade: r.get(5)?,
        unit: r.get(6)?,
        unit_rate_price: decimal_column(r, 7)?,
        qty: decimal_column(r, 8)?,
        total_amount: decimal_column(r, 9)?,
    })
}

pub fn insert(conn: &Connection, rec: &NewRecord) -> Result<FinancialRecord> {
    ensure_amount("unit_rate_price", rec.unit_rate_price)?;
    ensure_amount("qty", rec.qty)?;
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM projects WHERE id=?1",
            params![rec.project_id],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(LedgerError::ProjectNotFound(rec.project_id).into());
    }

    let total = line_total(rec.unit_rate_price, rec.qty)?;
    conn.execute(
        "INSERT INTO financial_records(project_id, date, description, category, trade, unit,
         unit_rate_price, qty, total_amount) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            rec.project_id,
            rec.date,
            rec.description.trim(),
            rec.category.as_str(),
            rec.trade.trim(),
            rec.unit.trim(),
            rec.unit_rate_price.to_string(),
            rec.qty.to_string(),
            total.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, project_id = rec.project_id, %total, "recorded financial record");
    get(conn, id)
}

pub fn get(conn: &Connection, id: i64) -> Result<FinancialRecord> {
    let sql = format!("SELECT {} FROM financial_records WHERE id=?1", COLUMNS);
    conn.query_row(&sql, params![id], from_row)
        .optional()?
        .ok_or_else(|| LedgerError::RecordNotFound(id).into())
}

pub fn list_for_project(conn: &Connection, project_id: i64) -> Result<Vec<FinancialRecord>> {
    let sql = format!(
        "SELECT {} FROM financial_records WHERE project_id=?1 ORDER BY date, id",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![project_id], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    tracing::debug!(project_id, count = out.len(), "loaded financial records");
    Ok(out)
}

/// Result of a filtered listing: the page of records plus the summary of
/// every match (not just the page).
#[derive(Debug, Serialize)]
pub struct RecordListing {
    pub records: Vec<FinancialRecord>,
    pub summary: RecordSummary,
    pub matched: usize,
    pub total: usize,
    pub active_filters: usize,
}

pub fn query(
    conn: &Connection,
    project_id: i64,
    filter: &RecordFilter,
    order: SortOrder,
    page: Page,
) -> Result<RecordListing> {
    let all = list_for_project(conn, project_id)?;
    let matched = apply(&all, &filter.criteria());
    let summary = summarize_records(matched.iter().copied());
    let mut records: Vec<FinancialRecord> = matched.into_iter().cloned().collect();
    if order == SortOrder::Desc {
        records.reverse();
    }
    Ok(RecordListing {
        matched: summary.record_count,
        total: all.len(),
        active_filters: filter.active_count(),
        records: page.apply(records),
        summary,
    })
}

/// Applies the patch and recomputes `total_amount` from the final rate and quantity.
pub fn update(conn: &Connection, id: i64, patch: &RecordPatch) -> Result<FinancialRecord> {
    let mut r = get(conn, id)?;
    if let Some(d) = patch.date {
        r.date = d;
    }
    if let Some(ref v) = patch.description {
        r.description = v.trim().to_string();
    }
    if let Some(c) = patch.category {
        r.category = c;
    }
    if let Some(ref v) = patch.trade {
        r.trade = v.trim().to_string();
    }
    if let Some(ref v) = patch.unit {
        r.unit = v.trim().to_string();
    }
    if let Some(v) = patch.unit_rate_price {
        r.unit_rate_price = ensure_amount("unit_rate_price", v)?;
    }
    if let Some(v) = patch.qty {
        r.qty = ensure_amount("qty", v)?;
    }
    r.total_amount = r.expected_total()?;
    conn.execute(
        "UPDATE financial_records SET date=?1, description=?2, category=?3, trade=?4, unit=?5,
         unit_rate_price=?6, qty=?7, total_amount=?8, updated_at=datetime('now') WHERE id=?9",
        params![
            r.date,
            r.description,
            r.category.as_str(),
            r.trade,
            r.unit,
            r.unit_rate_price.to_string(),
            r.qty.to_string(),
            r.total_amount.to_string(),
            id
        ],
    )?;
    tracing::info!(id, total = %r.total_amount, "updated financial record");
    Ok(r)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM financial_records WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::RecordNotFound(id).into());
    }
    tracing::info!(id, "deleted financial record");
    Ok(())
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> RecordFilter {
    let s = |key: &str| sub.get_one::<String>(key).cloned().unwrap_or_default();
    RecordFilter {
        date_from: s("from"),
        date_to: s("to"),
        description: s("description"),
        category: s("category"),
        trade: s("trade"),
        unit: s("unit"),
        unit_rate_price_min: s("rate_min"),
        unit_rate_price_max: s("rate_max"),
        qty_min: s("qty_min"),
        qty_max: s("qty_max"),
        total_amount_min: s("total_min"),
        total_amount_max: s("total_max"),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let text = |key: &str| sub.get_one::<String>(key).cloned().unwrap_or_default();
    let rec = NewRecord {
        project_id,
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        description: text("description"),
        category: sub.get_one::<String>("category").unwrap().parse()?,
        trade: text("trade"),
        unit: text("unit"),
        unit_rate_price: parse_amount("unit_rate_price", sub.get_one::<String>("rate").unwrap())?,
        qty: parse_amount("qty", sub.get_one::<String>("qty").unwrap())?,
    };
    let stored = insert(conn, &rec)?;
    println!(
        "Recorded {} line {} for {}",
        stored.category,
        stored.id,
        fmt_money(&stored.total_amount, &currency_label(conn)?)
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = RecordPatch {
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        category: sub
            .get_one::<String>("category")
            .map(|s| s.parse::<RecordCategory>())
            .transpose()?,
        trade: sub.get_one::<String>("trade").cloned(),
        unit: sub.get_one::<String>("unit").cloned(),
        unit_rate_price: sub
            .get_one::<String>("rate")
            .map(|s| parse_amount("unit_rate_price", s))
            .transpose()?,
        qty: sub
            .get_one::<String>("qty")
            .map(|s| parse_amount("qty", s))
            .transpose()?,
    };
    let r = update(conn, id, &patch)?;
    println!(
        "Updated financial record {} (total {})",
        r.id,
        fmt_money(&r.total_amount, &currency_label(conn)?)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let listing = query(
        conn,
        project_id,
        &filter_from_args(sub),
        order_from_args(sub)?,
        page_from_args(sub),
    )?;
    if jsonl_flag {
        maybe_print_json(false, true, &listing.records)?;
        return Ok(());
    }
    if maybe_print_json(json_flag, false, &listing)? {
        return Ok(());
    }
    if listing.total == 0 {
        println!("No financial records found. Add one with `sitebook record add`.");
        return Ok(());
    }

    let label = currency_label(conn)?;
    let rows: Vec<Vec<String>> = listing
        .records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.to_string(),
                r.description.clone(),
                r.category.to_string(),
                r.trade.clone(),
                r.unit.clone(),
                format!("{:.3}", r.unit_rate_price),
                format!("{:.3}", r.qty),
                format!("{:.3}", r.total_amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID",
                "Date",
                "Description",
                "Category",
                "Trade",
                "Unit",
                "Unit Rate",
                "Qty",
                "Total",
            ],
            rows,
        )
    );

    let s = &listing.summary;
    let mut footer = format!("Showing {} of {} records", listing.matched, listing.total);
    if listing.active_filters > 0 {
        footer.push_str(&format!(" ({} filters active)", listing.active_filters));
    }
    println!("{}", footer);
    println!(
        "{}",
        pretty_table(
            &["Total Records", "Total Amount", "Total Credit", "Total Debit", "Balance"],
            vec![vec![
                s.record_count.to_string(),
                fmt_money(&s.total_amount, &label),
                fmt_money(&s.total_credit, &label),
                fmt_money(&s.total_debit, &label),
                fmt_money(&s.total_balance, &label),
            ]],
        )
    );
    Ok(())
}
