// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage for the dashboard's category keyword table.
//!
//! Until the table is first edited, the built-in defaults apply and nothing
//! is stored. The first edit copies the defaults in, and every edit (reset
//! included) bumps `keyword_version` in `settings`, so versions never repeat.

use crate::ledger::{CategoryClass, KeywordRule, KeywordTable};
use crate::utils::{get_setting, maybe_print_json, pretty_table, set_setting};
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};

const VERSION_KEY: &str = "keyword_version";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let keyword = sub.get_one::<String>("keyword").unwrap();
            let class: CategoryClass = sub.get_one::<String>("class").unwrap().parse()?;
            let table = add_keyword(conn, keyword, class)?;
            println!(
                "Added keyword '{}' -> {} (table v{})",
                keyword.trim().to_lowercase(),
                class,
                table.version
            );
        }
        Some(("rm", sub)) => {
            let keyword = sub.get_one::<String>("keyword").unwrap();
            let class = sub
                .get_one::<String>("class")
                .map(|s| s.parse::<CategoryClass>())
                .transpose()?;
            let table = remove_keyword(conn, keyword, class)?;
            println!(
                "Removed keyword '{}' (table v{})",
                keyword.trim(),
                table.version
            );
        }
        Some(("reset", _)) => {
            let table = reset(conn)?;
            println!("Keyword table reset to built-in defaults (table v{})", table.version);
        }
        Some(("list", sub)) => {
            let table = load_table(conn)?;
            if !maybe_print_json(sub.get_flag("json"), false, &table)? {
                let rows = table
                    .rules
                    .iter()
                    .map(|r| vec![r.keyword.clone(), r.class.to_string()])
                    .collect();
                println!("Keyword table v{}", table.version);
                println!("{}", pretty_table(&["Keyword", "Class"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

fn stored_version(conn: &Connection) -> Result<Option<u32>> {
    match get_setting(conn, VERSION_KEY)? {
        Some(v) => Ok(Some(
            v.parse::<u32>()
                .with_context(|| format!("Invalid keyword_version '{}'", v))?,
        )),
        None => Ok(None),
    }
}

pub fn load_table(conn: &Connection) -> Result<KeywordTable> {
    let Some(version) = stored_version(conn)? else {
        return Ok(KeywordTable::default());
    };
    let mut stmt = conn.prepare("SELECT keyword, class FROM category_keywords ORDER BY id")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut rules = Vec::new();
    for row in rows {
        let (keyword, class) = row?;
        rules.push(KeywordRule::new(&keyword, class.parse()?));
    }
    Ok(KeywordTable::new(version, rules))
}

/// Replaces the stored rules and version in one transaction.
fn save_table(conn: &Connection, table: &KeywordTable) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM category_keywords", [])?;
    {
        let mut stmt = tx
            .prepare("INSERT OR IGNORE INTO category_keywords(keyword, class) VALUES (?1, ?2)")?;
        for r in &table.rules {
            stmt.execute(params![r.keyword, r.class.as_str()])?;
        }
    }
    set_setting(&tx, VERSION_KEY, &table.version.to_string())?;
    tx.commit()?;
    tracing::info!(version = table.version, rules = table.rules.len(), "saved keyword table");
    Ok(())
}

pub fn add_keyword(conn: &Connection, keyword: &str, class: CategoryClass) -> Result<KeywordTable> {
    let rule = KeywordRule::new(keyword, class);
    if rule.keyword.is_empty() {
        return Err(anyhow!("Keyword must not be empty"));
    }
    let mut table = load_table(conn)?;
    if !table.rules.contains(&rule) {
        table.rules.push(rule);
    }
    table.version += 1;
    save_table(conn, &table)?;
    Ok(table)
}

/// Removes the keyword from `class`, or from both classes when `class` is `None`.
pub fn remove_keyword(
    conn: &Connection,
    keyword: &str,
    class: Option<CategoryClass>,
) -> Result<KeywordTable> {
    let keyword = keyword.trim().to_lowercase();
    let mut table = load_table(conn)?;
    let before = table.rules.len();
    table
        .rules
        .retain(|r| !(r.keyword == keyword && class.is_none_or(|c| c == r.class)));
    if table.rules.len() == before {
        return Err(anyhow!("Keyword '{}' is not in the table", keyword));
    }
    table.version += 1;
    save_table(conn, &table)?;
    Ok(table)
}

/// Restores the built-in rules under a new version so readers holding the
/// old version see the change.
pub fn reset(conn: &Connection) -> Result<KeywordTable> {
    let version = load_table(conn)?.version + 1;
    let table = KeywordTable::new(version, KeywordTable::default().rules);
    save_table(conn, &table)?;
    Ok(table)
}
