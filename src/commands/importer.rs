// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{self, NewTransaction};
use crate::utils::{id_for_project, parse_amount, parse_date};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::Path;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let project_id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(conn, project_id, Path::new(path))?;
            println!("Imported {} transaction(s) from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Loads `date,notes,category,credit,debit` rows into a project's ledger.
/// Blank amounts count as zero. The whole file is one database transaction:
/// a bad row leaves the ledger untouched.
pub fn import_transactions(conn: &mut Connection, project_id: i64, path: &Path) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let rec = result?;
        let date_raw = rec
            .get(0)
            .with_context(|| format!("line {}: date missing", line))?;
        let amount = |idx: usize, field: &'static str| -> Result<Decimal> {
            match rec.get(idx).filter(|s| !s.is_empty()) {
                Some(raw) => parse_amount(field, raw)
                    .with_context(|| format!("line {}: invalid {} '{}'", line, field, raw)),
                None => Ok(Decimal::ZERO),
            }
        };
        let entry = NewTransaction {
            project_id,
            date: parse_date(date_raw)
                .with_context(|| format!("line {}: invalid date '{}'", line, date_raw))?,
            notes: rec.get(1).unwrap_or("").to_string(),
            category: rec.get(2).unwrap_or("").to_string(),
            credit: amount(3, "credit")?,
            debit: amount(4, "debit")?,
        };
        transactions::insert(&tx, &entry).with_context(|| format!("line {}", line))?;
        count += 1;
    }
    tx.commit()?;
    tracing::info!(project_id, count, path = %path.display(), "imported transactions");
    Ok(count)
}
