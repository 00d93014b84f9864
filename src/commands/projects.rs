// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::records;
use crate::error::{ensure_amount, LedgerError};
use crate::ledger::{project_costs, ProjectCosts};
use crate::models::{Project, ProjectView};
use crate::utils::{
    currency_label, decimal_column, fmt_money, id_for_project, maybe_print_json, parse_amount,
    pretty_table,
};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
            delete(conn, id)?;
            println!("Removed project {} with its transactions and records", id);
        }
        Some(("refresh-costs", sub)) => {
            let id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
            let costs = refresh_costs(conn, id)?;
            let label = currency_label(conn)?;
            println!(
                "Project {}: contractor {}, material {}, total {}",
                id,
                fmt_money(&costs.contractor_cost, &label),
                fmt_money(&costs.material_cost, &label),
                fmt_money(&costs.total_cost(), &label)
            );
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub contractor_cost: Decimal,
    pub material_cost: Decimal,
    pub budget: Decimal,
}

/// Fields left `None` keep their value. A blank `location` or `description`
/// clears the stored one.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub contractor_cost: Option<Decimal>,
    pub material_cost: Option<Decimal>,
    pub budget: Option<Decimal>,
}

const COLUMNS: &str = "id, name, location, description, contractor_cost, material_cost, budget";

fn from_row(r: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: r.get(0)?,
        name: r.get(1)?,
        location: r.get(2)?,
        description: r.get(3)?,
        contractor_cost: decimal_column(r, 4)?,
        material_cost: decimal_column(r, 5)?,
        budget: decimal_column(r, 6)?,
    })
}

fn non_blank(s: Option<&String>) -> Option<String> {
    s.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn insert(conn: &Connection, p: &NewProject) -> Result<i64> {
    ensure_amount("contractor_cost", p.contractor_cost)?;
    ensure_amount("material_cost", p.material_cost)?;
    ensure_amount("budget", p.budget)?;
    conn.execute(
        "INSERT INTO projects(name, location, description, contractor_cost, material_cost, budget)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            p.name.trim(),
            p.location,
            p.description,
            p.contractor_cost.to_string(),
            p.material_cost.to_string(),
            p.budget.to_string()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name = %p.name, "created project");
    Ok(id)
}

pub fn get(conn: &Connection, id: i64) -> Result<Project> {
    let sql = format!("SELECT {} FROM projects WHERE id=?1", COLUMNS);
    conn.query_row(&sql, params![id], from_row)
        .optional()?
        .ok_or_else(|| LedgerError::ProjectNotFound(id).into())
}

pub fn list_all(conn: &Connection) -> Result<Vec<Project>> {
    let sql = format!("SELECT {} FROM projects ORDER BY name, id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn update(conn: &Connection, id: i64, patch: &ProjectPatch) -> Result<Project> {
    let mut p = get(conn, id)?;
    if let Some(ref name) = patch.name {
        p.name = name.trim().to_string();
    }
    if let Some(ref location) = patch.location {
        p.location = non_blank(Some(location));
    }
    if let Some(ref description) = patch.description {
        p.description = non_blank(Some(description));
    }
    if let Some(v) = patch.contractor_cost {
        p.contractor_cost = ensure_amount("contractor_cost", v)?;
    }
    if let Some(v) = patch.material_cost {
        p.material_cost = ensure_amount("material_cost", v)?;
    }
    if let Some(v) = patch.budget {
        p.budget = ensure_amount("budget", v)?;
    }
    conn.execute(
        "UPDATE projects SET name=?1, location=?2, description=?3, contractor_cost=?4,
         material_cost=?5, budget=?6, updated_at=datetime('now') WHERE id=?7",
        params![
            p.name,
            p.location,
            p.description,
            p.contractor_cost.to_string(),
            p.material_cost.to_string(),
            p.budget.to_string(),
            id
        ],
    )?;
    tracing::info!(id, "updated project");
    Ok(p)
}

pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM projects WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::ProjectNotFound(id).into());
    }
    tracing::info!(id, "deleted project");
    Ok(())
}

/// Recomputes contractor and material cost from the project's financial records.
pub fn refresh_costs(conn: &Connection, id: i64) -> Result<ProjectCosts> {
    let recs = records::list_for_project(conn, id)?;
    let costs = project_costs(&recs);
    update(
        conn,
        id,
        &ProjectPatch {
            contractor_cost: Some(costs.contractor_cost),
            material_cost: Some(costs.material_cost),
            ..Default::default()
        },
    )?;
    tracing::info!(id, records = recs.len(), ?costs, "refreshed project costs");
    Ok(costs)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = |key: &'static str| -> Result<Decimal> {
        match sub.get_one::<String>(key) {
            Some(s) => parse_amount(key, s),
            None => Ok(Decimal::ZERO),
        }
    };
    let p = NewProject {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        location: non_blank(sub.get_one::<String>("location")),
        description: non_blank(sub.get_one::<String>("description")),
        contractor_cost: amount("contractor_cost")?,
        material_cost: amount("material_cost")?,
        budget: amount("budget")?,
    };
    let id = insert(conn, &p)?;
    println!("Added project '{}' (id {})", p.name, id);
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let amount = |key: &'static str| -> Result<Option<Decimal>> {
        sub.get_one::<String>(key)
            .map(|s| parse_amount(key, s))
            .transpose()
    };
    let patch = ProjectPatch {
        name: non_blank(sub.get_one::<String>("name")),
        location: sub.get_one::<String>("location").cloned(),
        description: sub.get_one::<String>("description").cloned(),
        contractor_cost: amount("contractor_cost")?,
        material_cost: amount("material_cost")?,
        budget: amount("budget")?,
    };
    let p = update(conn, id, &patch)?;
    println!("Updated project '{}' (id {})", p.name, p.id);
    Ok(())
}

fn view_row(v: &ProjectView, label: &str) -> Vec<String> {
    vec![
        v.id.to_string(),
        v.name.clone(),
        v.location.clone().unwrap_or_else(|| "-".into()),
        v.description.clone().unwrap_or_else(|| "-".into()),
        fmt_money(&v.total_cost, label),
        fmt_money(&v.budget, label),
        fmt_money(&v.variance, label),
    ]
}

const HEADERS: [&str; 7] = [
    "ID",
    "Project Name",
    "Location",
    "Description",
    "Total Cost",
    "Budget",
    "Variance",
];

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let views: Vec<ProjectView> = list_all(conn)?.iter().map(ProjectView::from).collect();
    if !maybe_print_json(json_flag, jsonl_flag, &views)? {
        if views.is_empty() {
            println!("No construction projects found. Create one with `sitebook project add`.");
            return Ok(());
        }
        let label = currency_label(conn)?;
        let rows = views.iter().map(|v| view_row(v, &label)).collect();
        println!("{}", pretty_table(&HEADERS, rows));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = id_for_project(conn, sub.get_one::<String>("project").unwrap())?;
    let view = ProjectView::from(&get(conn, id)?);
    if !maybe_print_json(sub.get_flag("json"), false, &view)? {
        let label = currency_label(conn)?;
        let rows = vec![
            vec!["Name".into(), view.name.clone()],
            vec![
                "Location".into(),
                view.location.clone().unwrap_or_else(|| "-".into()),
            ],
            vec![
                "Description".into(),
                view.description.clone().unwrap_or_else(|| "-".into()),
            ],
            vec![
                "Contractor Cost".into(),
                fmt_money(&view.contractor_cost, &label),
            ],
            vec!["Material Cost".into(), fmt_money(&view.material_cost, &label)],
            vec!["Total Cost".into(), fmt_money(&view.total_cost, &label)],
            vec!["Budget".into(), fmt_money(&view.budget, &label)],
            vec!["Variance".into(), fmt_money(&view.variance, &label)],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}
