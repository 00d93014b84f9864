// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Demo dataset: three projects and a cashbook ledger for the first.

use crate::commands::projects::{self, NewProject};
use crate::commands::transactions::{self, NewTransaction};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{bail, Result};
use rusqlite::Connection;

struct DemoProject {
    name: &'static str,
    contractor_cost: &'static str,
    material_cost: &'static str,
    budget: &'static str,
}

const PROJECTS: [DemoProject; 3] = [
    DemoProject {
        name: "Sajjad Factory Ansari Chowk Multan",
        contractor_cost: "250000",
        material_cost: "150000",
        budget: "450000",
    },
    DemoProject {
        name: "Commercial Plaza Downtown",
        contractor_cost: "300000",
        material_cost: "200000",
        budget: "520000",
    },
    DemoProject {
        name: "Residential Complex North",
        contractor_cost: "180000",
        material_cost: "120000",
        budget: "350000",
    },
];

/// (project index, date, notes, category, credit, debit)
type DemoEntry = (
    usize,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const ENTRIES: [DemoEntry; 18] = [
    (0, "2025-06-26", "Total expenses of Site (Cashbook Record)", "Expenses", "0", "7532.060"),
    (0, "2025-06-25", "Total Receiving From Site (Cashbook Record)", "Receiving", "6300.000", "0"),
    (0, "2025-07-03", "Direct Labour", "LabourTools", "0", "2.650"),
    (0, "2025-07-03", "Fazzil", "Freights", "0", "3.000"),
    (0, "2025-07-03", "Ramzan", "StealFixer", "0", "6.500"),
    (0, "2025-07-03", "Allah Diwaya Plaster", "Contractor", "0", "70.000"),
    (0, "2025-07-03", "Riaz Cont Flooring", "Contractor", "0", "77.000"),
    (0, "2025-07-10", "Direct Labour", "LabourWork", "0", "14.250"),
    (0, "2025-07-10", "Site Labour", "Refreshments", "0", "1.000"),
    (0, "2025-07-10", "Ahmed", "Contractor", "0", "10.000"),
    (0, "2025-07-10", "Allah Diwaya Plaster", "Contractor", "0", "30.000"),
    (0, "2025-07-17", "Direct Labour", "LabourWork", "0", "28.350"),
    (0, "2025-07-17", "Fazzil", "Freights", "0", "1.300"),
    (0, "2025-07-17", "Roshan Tiles Fixer", "Contractor", "0", "10.000"),
    (0, "2025-07-17", "Ahmed Tuiffelles", "Contractor", "0", "10.000"),
    (1, "2025-08-01", "Initial payment", "Payment", "50000", "0"),
    (1, "2025-08-02", "Material purchase", "Materials", "0", "25000"),
    (2, "2025-08-01", "Project advance", "Payment", "30000", "0"),
];

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let ids = seed(conn, m.get_flag("reset"))?;
    println!(
        "Seeded {} projects and {} transactions (project ids {:?})",
        ids.len(),
        ENTRIES.len(),
        ids
    );
    Ok(())
}

/// Loads the demo dataset and returns the new project ids. A database that
/// already holds projects is refused unless `reset` wipes it first.
pub fn seed(conn: &mut Connection, reset: bool) -> Result<Vec<i64>> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM projects", [], |r| r.get(0))?;
    if existing > 0 && !reset {
        bail!(
            "Database already holds {} project(s); pass --reset to replace them",
            existing
        );
    }

    let tx = conn.transaction()?;
    if reset {
        tx.execute("DELETE FROM projects", [])?;
        tracing::warn!(removed = existing, "cleared projects before seeding");
    }

    let mut ids = Vec::with_capacity(PROJECTS.len());
    for p in &PROJECTS {
        ids.push(projects::insert(
            &tx,
            &NewProject {
                name: p.name.to_string(),
                location: None,
                description: None,
                contractor_cost: parse_decimal(p.contractor_cost)?,
                material_cost: parse_decimal(p.material_cost)?,
                budget: parse_decimal(p.budget)?,
            },
        )?);
    }
    for (idx, date, notes, category, credit, debit) in ENTRIES {
        transactions::insert(
            &tx,
            &NewTransaction {
                project_id: ids[idx],
                date: parse_date(date)?,
                notes: notes.to_string(),
                category: category.to_string(),
                credit: parse_decimal(credit)?,
                debit: parse_decimal(debit)?,
            },
        )?;
    }
    // The cashbook rows arrive out of date order.
    for id in &ids {
        transactions::rebalance(&tx, *id)?;
    }
    tx.commit()?;
    tracing::info!(projects = ids.len(), entries = ENTRIES.len(), "seeded demo data");
    Ok(ids)
}
