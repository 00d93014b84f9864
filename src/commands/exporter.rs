// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{records, transactions};
use crate::utils::id_for_project;
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use serde_json::json;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let (what, sub) = match m.subcommand() {
        Some((what, sub)) => (what, sub),
        None => return Ok(()),
    };
    let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let n = match what {
        "transactions" => export_transactions(conn, project_id, &fmt, Path::new(out))?,
        "records" => export_records(conn, project_id, &fmt, Path::new(out))?,
        _ => return Ok(()),
    };
    println!("Exported {} {} to {}", n, what, out);
    Ok(())
}

/// Writes the project's ledger, in ledger order, as `csv` or `json`.
pub fn export_transactions(
    conn: &Connection,
    project_id: i64,
    fmt: &str,
    out: &Path,
) -> Result<usize> {
    let txs = transactions::list_for_project(conn, project_id)?;
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(["date", "notes", "category", "credit", "debit", "balance"])?;
            for t in &txs {
                wtr.write_record([
                    t.date.to_string(),
                    t.notes.clone(),
                    t.category.clone(),
                    t.credit.to_string(),
                    t.debit.to_string(),
                    t.balance.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date.to_string(), "notes": t.notes, "category": t.category,
                        "credit": t.credit.to_string(), "debit": t.debit.to_string(),
                        "balance": t.balance.to_string()
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(project_id, count = txs.len(), out = %out.display(), "exported transactions");
    Ok(txs.len())
}

pub fn export_records(conn: &Connection, project_id: i64, fmt: &str, out: &Path) -> Result<usize> {
    let recs = records::list_for_project(conn, project_id)?;
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record([
                "date",
                "description",
                "category",
                "trade",
                "unit",
                "unit_rate_price",
                "qty",
                "total_amount",
            ])?;
            for r in &recs {
                wtr.write_record([
                    r.date.to_string(),
                    r.description.clone(),
                    r.category.to_string(),
                    r.trade.clone(),
                    r.unit.clone(),
                    r.unit_rate_price.to_string(),
                    r.qty.to_string(),
                    r.total_amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&recs)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(project_id, count = recs.len(), out = %out.display(), "exported records");
    Ok(recs.len())
}
