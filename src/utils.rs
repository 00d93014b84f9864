// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_amount, LedgerError};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parses a money or quantity input: non-negative and at most `MAX_AMOUNT`.
pub fn parse_amount(field: &'static str, s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    Ok(ensure_amount(field, d)?)
}

pub fn fmt_money(d: &Decimal, label: &str) -> String {
    format!("{} {:.2}", label, d)
}

/// Reads a decimal stored as TEXT.
pub fn decimal_column(r: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    Decimal::from_str(s.trim()).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Resolves `--project` given either a numeric id or an exact project name.
pub fn id_for_project(conn: &Connection, key: &str) -> Result<i64> {
    let key = key.trim();
    if let Ok(id) = key.parse::<i64>() {
        let found: Option<i64> = conn
            .query_row("SELECT id FROM projects WHERE id=?1", params![id], |r| r.get(0))
            .optional()?;
        return found.ok_or_else(|| LedgerError::ProjectNotFound(id).into());
    }
    let mut stmt = conn.prepare("SELECT id FROM projects WHERE name=?1 ORDER BY id LIMIT 1")?;
    let id: i64 = stmt
        .query_row(params![key], |r| r.get(0))
        .with_context(|| format!("Project '{}' not found", key))?;
    Ok(id)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(anyhow::anyhow!("Unknown order '{}' (use asc|desc)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Page {
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let it = items.into_iter().skip(self.offset);
        match self.limit {
            Some(n) => it.take(n).collect(),
            None => it.collect(),
        }
    }
}

pub fn page_from_args(sub: &clap::ArgMatches) -> Page {
    Page {
        limit: sub.get_one::<usize>("limit").copied(),
        offset: sub.get_one::<usize>("offset").copied().unwrap_or(0),
    }
}

pub fn order_from_args(sub: &clap::ArgMatches) -> Result<SortOrder> {
    match sub.get_one::<String>("order") {
        Some(s) => s.parse(),
        None => Ok(SortOrder::default()),
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

// Label printed in front of amounts in table output
pub fn currency_label(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "currency_label")?.unwrap_or_else(|| "Rs".to_string()))
}

pub fn set_currency_label(conn: &Connection, label: &str) -> Result<()> {
    set_setting(conn, "currency_label", label.trim())
}
