// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{projects, records, transactions};
use crate::ledger::balance::stale_balances;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub project_id: i64,
    pub detail: String,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let issues = check(conn)?;
    if maybe_print_json(m.get_flag("json"), false, &issues)? {
        return Ok(());
    }
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues
            .iter()
            .map(|i| vec![i.kind.to_string(), i.project_id.to_string(), i.detail.clone()])
            .collect();
        println!("{}", pretty_table(&["Issue", "Project", "Detail"], rows));
    }
    Ok(())
}

/// Scans every project for stored values that disagree with their sources.
pub fn check(conn: &Connection) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    for p in projects::list_all(conn)? {
        let txs = transactions::list_for_project(conn, p.id)?;
        for t in &txs {
            if t.credit < Decimal::ZERO || t.debit < Decimal::ZERO {
                issues.push(Issue {
                    kind: "negative_amount",
                    project_id: p.id,
                    detail: format!("transaction {} credit {} debit {}", t.id, t.credit, t.debit),
                });
            }
        }
        for s in stale_balances(txs) {
            issues.push(Issue {
                kind: "stale_balance",
                project_id: p.id,
                detail: format!(
                    "transaction {} on {}: stored {} expected {}",
                    s.id, s.date, s.stored, s.expected
                ),
            });
        }

        for r in records::list_for_project(conn, p.id)? {
            if r.unit_rate_price < Decimal::ZERO || r.qty < Decimal::ZERO {
                issues.push(Issue {
                    kind: "negative_amount",
                    project_id: p.id,
                    detail: format!("record {} rate {} qty {}", r.id, r.unit_rate_price, r.qty),
                });
            }
            let drift = match r.expected_total() {
                Ok(expected) if expected == r.total_amount => None,
                Ok(expected) => Some(format!(
                    "record {}: stored {} expected {}",
                    r.id, r.total_amount, expected
                )),
                Err(e) => Some(format!("record {}: {}", r.id, e)),
            };
            if let Some(detail) = drift {
                issues.push(Issue {
                    kind: "total_amount_drift",
                    project_id: p.id,
                    detail,
                });
            }
        }

        for (field, value) in [
            ("contractor_cost", p.contractor_cost),
            ("material_cost", p.material_cost),
            ("budget", p.budget),
        ] {
            if value < Decimal::ZERO {
                issues.push(Issue {
                    kind: "negative_amount",
                    project_id: p.id,
                    detail: format!("{} {}", field, value),
                });
            }
        }
    }
    if !issues.is_empty() {
        tracing::warn!(count = issues.len(), "doctor found issues");
    }
    Ok(issues)
}
