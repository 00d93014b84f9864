// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal_macros::dec;
use serde_json::json;
use sitebook::commands::exporter;
use sitebook::commands::projects::{self, NewProject};
use sitebook::commands::records::{self, NewRecord};
use sitebook::commands::transactions::{self, NewTransaction};
use sitebook::models::RecordCategory;
use sitebook::utils::parse_date;
use sitebook::{cli, db};
use tempfile::tempdir;

fn base_conn() -> (Connection, i64) {
    let conn = db::open_in_memory().unwrap();
    let id = projects::insert(
        &conn,
        &NewProject {
            name: "Plaza".into(),
            ..Default::default()
        },
    )
    .unwrap();
    transactions::insert(
        &conn,
        &NewTransaction {
            project_id: id,
            date: parse_date("2025-08-01").unwrap(),
            notes: "Initial payment".into(),
            category: "Payment".into(),
            credit: dec!(50000),
            debit: dec!(0),
        },
    )
    .unwrap();
    records::insert(
        &conn,
        &NewRecord {
            project_id: id,
            date: parse_date("2025-08-02").unwrap(),
            description: "Cement".into(),
            category: RecordCategory::Supplier,
            trade: "Masonry".into(),
            unit: "bag".into(),
            unit_rate_price: dec!(1250),
            qty: dec!(2),
        },
    )
    .unwrap();
    (conn, id)
}

#[test]
fn export_transactions_as_pretty_json() {
    let (conn, _) = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "sitebook",
        "export",
        "transactions",
        "--project",
        "Plaza",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-08-01",
                "notes": "Initial payment",
                "category": "Payment",
                "credit": "50000",
                "debit": "0",
                "balance": "50000"
            }
        ])
    );
}

#[test]
fn export_records_as_csv_defaults_format() {
    let (conn, id) = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("records.csv");
    let out_str = out_path.to_string_lossy().to_string();
    let pid = id.to_string();

    let matches = cli::build_cli().get_matches_from([
        "sitebook", "export", "records", "--project", &pid, "--out", &out_str,
    ]);
    let (_, export_m) = matches.subcommand().unwrap();
    exporter::handle(&conn, export_m).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("date,description,category,trade,unit,unit_rate_price,qty,total_amount")
    );
    assert_eq!(
        lines.next(),
        Some("2025-08-02,Cement,Supplier,Masonry,bag,1250,2,2500")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn unknown_format_is_an_error() {
    let (conn, id) = base_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.xml");
    let err = exporter::export_transactions(&conn, id, "xml", &out).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}
