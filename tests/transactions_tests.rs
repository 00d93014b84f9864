// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sitebook::commands::projects::{self, NewProject};
use sitebook::commands::transactions::{self, NewTransaction, TransactionPatch};
use sitebook::error::LedgerError;
use sitebook::utils::parse_date;
use sitebook::{cli, db};

fn setup() -> (Connection, i64) {
    let conn = db::open_in_memory().unwrap();
    let id = projects::insert(
        &conn,
        &NewProject {
            name: "Site".into(),
            ..Default::default()
        },
    )
    .unwrap();
    (conn, id)
}

fn entry(project_id: i64, date: &str, category: &str, credit: Decimal, debit: Decimal) -> NewTransaction {
    NewTransaction {
        project_id,
        date: parse_date(date).unwrap(),
        notes: format!("{} entry", category),
        category: category.into(),
        credit,
        debit,
    }
}

fn list_rows(conn: &Connection, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["sitebook", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(conn, list_m).unwrap();
        }
    }
    panic!("no tx list subcommand");
}

#[test]
fn stored_balance_is_running_balance() {
    let (conn, p) = setup();
    let a = transactions::insert(&conn, &entry(p, "2025-06-25", "Receiving", dec!(6300), dec!(0))).unwrap();
    let b = transactions::insert(&conn, &entry(p, "2025-06-26", "Expenses", dec!(0), dec!(7532.060))).unwrap();
    assert_eq!(a.balance, dec!(6300));
    assert_eq!(b.balance, dec!(-1232.06));
}

#[test]
fn back_dated_entry_leaves_later_balance_stale_until_rebalanced() {
    let (conn, p) = setup();
    let late = transactions::insert(&conn, &entry(p, "2025-06-26", "Expenses", dec!(0), dec!(7532.06))).unwrap();
    let early = transactions::insert(&conn, &entry(p, "2025-06-25", "Receiving", dec!(6300), dec!(0))).unwrap();
    assert_eq!(late.balance, dec!(-7532.06));
    assert_eq!(early.balance, dec!(6300));
    assert_eq!(transactions::get(&conn, late.id).unwrap().balance, dec!(-7532.06));

    assert_eq!(transactions::rebalance(&conn, p).unwrap(), 1);
    assert_eq!(transactions::get(&conn, late.id).unwrap().balance, dec!(-1232.06));
    assert_eq!(transactions::rebalance(&conn, p).unwrap(), 0);
}

#[test]
fn same_day_entries_accumulate_in_insertion_order() {
    let (conn, p) = setup();
    let first = transactions::insert(&conn, &entry(p, "2025-07-03", "LabourTools", dec!(0), dec!(2.650))).unwrap();
    let second = transactions::insert(&conn, &entry(p, "2025-07-03", "Freights", dec!(0), dec!(3))).unwrap();
    assert_eq!(first.balance, dec!(-2.65));
    assert_eq!(second.balance, dec!(-5.65));
    let listed = transactions::list_for_project(&conn, p).unwrap();
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
}

#[test]
fn negative_amounts_are_rejected() {
    let (conn, p) = setup();
    let err = transactions::insert(&conn, &entry(p, "2025-07-03", "X", dec!(-1), dec!(0))).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NegativeAmount { field: "credit", .. })
    ));
    assert!(transactions::list_for_project(&conn, p).unwrap().is_empty());
}

#[test]
fn unknown_project_is_rejected() {
    let (conn, _) = setup();
    let err = transactions::insert(&conn, &entry(42, "2025-07-03", "X", dec!(1), dec!(0))).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::ProjectNotFound(42))
    ));
}

#[test]
fn list_limit_and_order() {
    let (conn, p) = setup();
    for day in 1..=3 {
        transactions::insert(
            &conn,
            &entry(p, &format!("2025-01-0{}", day), "Contractor", dec!(0), dec!(10)),
        )
        .unwrap();
    }
    let pid = p.to_string();

    let rows = list_rows(&conn, &["--project", &pid, "--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
    assert_eq!(rows[0].balance, "-30.000");

    let rows = list_rows(&conn, &["--project", &pid, "--order", "asc", "--offset", "1"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-02");
}

#[test]
fn list_filters_by_category_and_range() {
    let (conn, p) = setup();
    transactions::insert(&conn, &entry(p, "2025-07-03", "Contractor", dec!(0), dec!(70))).unwrap();
    transactions::insert(&conn, &entry(p, "2025-07-10", "LabourWork", dec!(0), dec!(14.25))).unwrap();
    transactions::insert(&conn, &entry(p, "2025-07-17", "Contractor", dec!(0), dec!(10))).unwrap();
    let pid = p.to_string();

    assert_eq!(list_rows(&conn, &["--project", &pid, "--category", "contractor"]).len(), 2);
    assert_eq!(list_rows(&conn, &["--project", &pid, "--category", "all"]).len(), 3);
    assert_eq!(list_rows(&conn, &["--project", &pid, "--category", "Contract"]).len(), 0);
    assert_eq!(list_rows(&conn, &["--project", &pid, "--debit-min", "12"]).len(), 2);
    let rows = list_rows(&conn, &["--project", &pid, "--from", "2025-07-04", "--to", "2025-07-17"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(list_rows(&conn, &["--project", &pid, "--date", "2025-07-10"]).len(), 1);
    assert_eq!(list_rows(&conn, &["--project", &pid, "--notes", "LABOUR"]).len(), 1);
}

#[test]
fn malformed_filter_values_are_ignored() {
    let (conn, p) = setup();
    transactions::insert(&conn, &entry(p, "2025-07-03", "Contractor", dec!(0), dec!(70))).unwrap();
    transactions::insert(&conn, &entry(p, "2025-07-10", "Payment", dec!(50), dec!(0))).unwrap();
    let pid = p.to_string();
    let rows = list_rows(&conn, &["--project", &pid, "--credit-min", "abc", "--from", "July"]);
    assert_eq!(rows.len(), 2);
}

#[test]
fn edit_keeps_snapshot_and_delete_reports_missing() {
    let (conn, p) = setup();
    let a = transactions::insert(&conn, &entry(p, "2025-07-03", "Payment", dec!(100), dec!(0))).unwrap();
    let b = transactions::insert(&conn, &entry(p, "2025-07-04", "Contractor", dec!(0), dec!(40))).unwrap();

    let edited = transactions::update(
        &conn,
        a.id,
        &TransactionPatch {
            credit: Some(dec!(80)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(edited.credit, dec!(80));
    assert_eq!(transactions::get(&conn, b.id).unwrap().balance, dec!(60));
    transactions::rebalance(&conn, p).unwrap();
    assert_eq!(transactions::get(&conn, a.id).unwrap().balance, dec!(80));
    assert_eq!(transactions::get(&conn, b.id).unwrap().balance, dec!(40));

    transactions::delete(&conn, a.id).unwrap();
    let err = transactions::delete(&conn, a.id).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::TransactionNotFound(_))
    ));
}

#[test]
fn categories_are_collected_across_projects() {
    let (conn, p) = setup();
    let q = projects::insert(
        &conn,
        &NewProject {
            name: "Other".into(),
            ..Default::default()
        },
    )
    .unwrap();
    transactions::insert(&conn, &entry(p, "2025-07-03", "Freights", dec!(0), dec!(1))).unwrap();
    transactions::insert(&conn, &entry(q, "2025-07-03", "Contractor", dec!(0), dec!(1))).unwrap();
    transactions::insert(&conn, &entry(q, "2025-07-04", "Freights", dec!(0), dec!(1))).unwrap();
    assert_eq!(
        transactions::all_categories(&conn).unwrap(),
        vec!["Contractor".to_string(), "Freights".to_string()]
    );
}

#[test]
fn oversized_amounts_and_balances_are_errors_not_panics() {
    let (conn, p) = setup();
    let err = transactions::insert(
        &conn,
        &entry(p, "2025-06-25", "Receiving", Decimal::MAX, dec!(0)),
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::AmountOverflow { field: "credit", .. })
    ));

    // A row written outside the store boundary still must not crash the next insert.
    conn.execute(
        "INSERT INTO transactions(project_id, date, credit, debit, balance)
         VALUES (?1, '2025-06-25', '79228162514264337593543950335', '0', '0')",
        [p],
    )
    .unwrap();
    let err = transactions::insert(&conn, &entry(p, "2025-06-26", "Receiving", dec!(1), dec!(0)))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::AmountOverflow { field: "balance", .. })
    ));
    assert_eq!(transactions::list_for_project(&conn, p).unwrap().len(), 1);
}
