// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sitebook::commands::projects::{self, NewProject};
use sitebook::commands::transactions::{self, NewTransaction};
use sitebook::commands::{dashboard, keywords, reports};
use sitebook::ledger::{CategoryClass, KeywordTable, TransactionFilter};
use sitebook::utils::parse_date;
use sitebook::{cli, db};

fn project(conn: &Connection, name: &str, contractor: Decimal, material: Decimal) -> i64 {
    projects::insert(
        conn,
        &NewProject {
            name: name.into(),
            contractor_cost: contractor,
            material_cost: material,
            budget: dec!(0),
            ..Default::default()
        },
    )
    .unwrap()
}

fn add(conn: &Connection, project_id: i64, date: &str, category: &str, credit: Decimal, debit: Decimal) {
    transactions::insert(
        conn,
        &NewTransaction {
            project_id,
            date: parse_date(date).unwrap(),
            notes: String::new(),
            category: category.into(),
            credit,
            debit,
        },
    )
    .unwrap();
}

fn cashbook() -> (Connection, i64) {
    let conn = db::open_in_memory().unwrap();
    let p = project(&conn, "Factory", dec!(250000), dec!(150000));
    add(&conn, p, "2025-06-26", "Expenses", dec!(0), dec!(7532.060));
    add(&conn, p, "2025-06-25", "Receiving", dec!(6300), dec!(0));
    add(&conn, p, "2025-07-03", "Contractor", dec!(0), dec!(70));
    (conn, p)
}

#[test]
fn ledger_recomputes_balances_in_date_order() {
    let (conn, p) = cashbook();
    let rows = reports::ledger_report(&conn, p, &TransactionFilter::default()).unwrap();
    let balances: Vec<Decimal> = rows.iter().map(|r| r.running_balance).collect();
    assert_eq!(balances, vec![dec!(6300), dec!(-1232.06), dec!(-1302.06)]);
    assert_eq!(rows[0].transaction.category, "Receiving");
}

#[test]
fn filtering_the_ledger_keeps_full_balances() {
    let (conn, p) = cashbook();
    let filter = TransactionFilter {
        category: "expenses".into(),
        ..Default::default()
    };
    let rows = reports::ledger_report(&conn, p, &filter).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].running_balance, dec!(-1232.06));
}

#[test]
fn summary_totals_follow_the_filter() {
    let (conn, p) = cashbook();
    let all = reports::project_report(&conn, p, &TransactionFilter::default()).unwrap();
    assert_eq!(all.summary.total_credit, dec!(6300));
    assert_eq!(all.summary.total_debit, dec!(7602.06));
    assert_eq!(all.summary.total_balance, dec!(-1302.06));
    assert_eq!(all.summary.entry_count, 3);
    assert!(!all.filtered);

    let filtered = reports::project_report(
        &conn,
        p,
        &TransactionFilter {
            date_from: "2025-06-26".into(),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(filtered.filtered);
    assert_eq!(filtered.summary.entry_count, 2);
    assert_eq!(filtered.summary.total_credit, dec!(0));
    assert_eq!(filtered.summary.total_balance, dec!(-7602.06));
    assert_eq!(
        filtered.categories,
        vec!["Contractor", "Expenses", "Receiving"]
    );
}

#[test]
fn empty_project_summarizes_to_zero() {
    let conn = db::open_in_memory().unwrap();
    let p = project(&conn, "Empty", dec!(0), dec!(0));
    let report = reports::project_report(&conn, p, &TransactionFilter::default()).unwrap();
    assert_eq!(report.summary.entry_count, 0);
    assert_eq!(report.summary.total_balance, Decimal::ZERO);
    assert!(report.categories.is_empty());
    assert!(reports::ledger_report(&conn, p, &TransactionFilter::default())
        .unwrap()
        .is_empty());
}

fn dashboard_conn() -> Connection {
    let conn = db::open_in_memory().unwrap();
    let a = project(&conn, "Factory", dec!(250000), dec!(150000));
    let b = project(&conn, "Plaza", dec!(300000), dec!(200000));
    add(&conn, a, "2025-07-03", "LabourWork", dec!(0), dec!(1));
    add(&conn, a, "2025-07-03", "Contractor", dec!(0), dec!(1));
    add(&conn, a, "2025-07-04", "Contractor", dec!(0), dec!(1));
    add(&conn, a, "2025-07-03", "Freights", dec!(0), dec!(1));
    add(&conn, b, "2025-08-02", "Materials", dec!(0), dec!(1));
    add(&conn, b, "2025-08-01", "Payment", dec!(1), dec!(0));
    add(&conn, b, "2025-08-01", "Steel bars", dec!(0), dec!(1));
    conn
}

#[test]
fn dashboard_counts_distinct_categories() {
    let conn = dashboard_conn();
    let stats = dashboard::stats(&conn).unwrap();
    assert_eq!(stats.total_projects, 2);
    assert_eq!(stats.total_contractors, 2);
    assert_eq!(stats.total_suppliers, 2);
    assert_eq!(stats.total_spent, dec!(900000));
}

#[test]
fn keyword_edits_are_versioned_and_change_the_dashboard() {
    let conn = dashboard_conn();
    assert_eq!(keywords::load_table(&conn).unwrap().version, 1);

    let table = keywords::add_keyword(&conn, " Steel ", CategoryClass::Supplier).unwrap();
    assert_eq!(table.version, 2);
    assert_eq!(table.rules.len(), 5);
    assert_eq!(keywords::load_table(&conn).unwrap(), table);
    assert_eq!(dashboard::stats(&conn).unwrap().total_suppliers, 3);

    let table = keywords::remove_keyword(&conn, "labour", None).unwrap();
    assert_eq!(table.version, 3);
    assert_eq!(dashboard::stats(&conn).unwrap().total_contractors, 1);

    assert!(keywords::remove_keyword(&conn, "labour", None).is_err());

    let reset = keywords::reset(&conn).unwrap();
    assert_eq!(reset.version, 4);
    let table = keywords::load_table(&conn).unwrap();
    assert_eq!(table, reset);
    assert_eq!(table.rules, KeywordTable::default().rules);
    assert_eq!(dashboard::stats(&conn).unwrap().total_suppliers, 2);
}

#[test]
fn category_report_shows_keyword_classes() {
    let conn = db::open_in_memory().unwrap();
    let p = project(&conn, "Factory", dec!(0), dec!(0));
    add(&conn, p, "2025-07-03", "LabourWork", dec!(0), dec!(1));
    add(&conn, p, "2025-07-03", "Freights", dec!(0), dec!(1));
    add(&conn, p, "2025-07-04", "Contractor Material", dec!(0), dec!(1));
    add(&conn, p, "2025-07-05", "Refreshments", dec!(0), dec!(1));

    let rows = reports::category_report(&conn, p).unwrap();
    let classes = |name: &str| {
        rows.iter()
            .find(|r| r.category == name)
            .map(|r| r.classes.clone())
            .unwrap()
    };
    assert_eq!(rows.len(), 4);
    assert_eq!(
        classes("Contractor Material"),
        vec![CategoryClass::Contractor, CategoryClass::Supplier]
    );
    assert_eq!(classes("Freights"), vec![CategoryClass::Supplier]);
    assert!(classes("Refreshments").is_empty());

    keywords::add_keyword(&conn, "refresh", CategoryClass::Supplier).unwrap();
    let rows = reports::category_report(&conn, p).unwrap();
    let refreshments = rows.iter().find(|r| r.category == "Refreshments").unwrap();
    assert_eq!(refreshments.classes, vec![CategoryClass::Supplier]);
}

#[test]
fn reset_never_reuses_a_version() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(keywords::reset(&conn).unwrap().version, 2);
    assert_eq!(keywords::add_keyword(&conn, "steel", CategoryClass::Supplier).unwrap().version, 3);
    assert_eq!(keywords::reset(&conn).unwrap().version, 4);
    assert_eq!(keywords::load_table(&conn).unwrap().version, 4);
}

#[test]
fn failed_keyword_save_leaves_table_untouched() {
    let conn = db::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER block_version BEFORE INSERT ON settings
         BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
    )
    .unwrap();
    assert!(keywords::add_keyword(&conn, "steel", CategoryClass::Supplier).is_err());
    let stored: i64 = conn
        .query_row("SELECT COUNT(*) FROM category_keywords", [], |r| r.get(0))
        .unwrap();
    assert_eq!(stored, 0);
    assert_eq!(keywords::load_table(&conn).unwrap(), KeywordTable::default());
}

#[test]
fn keywords_add_via_cli() {
    let conn = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from([
        "sitebook", "keywords", "add", "Tiles", "--class", "suppliers",
    ]);
    if let Some(("keywords", m)) = matches.subcommand() {
        keywords::handle(&conn, m).unwrap();
    } else {
        panic!("no keywords subcommand");
    }
    let table = keywords::load_table(&conn).unwrap();
    assert!(table.is(CategoryClass::Supplier, "Roshan Tiles"));
    assert!(!table.is(CategoryClass::Contractor, "Roshan Tiles"));

    let matches = cli::build_cli().get_matches_from([
        "sitebook", "keywords", "add", "tiles", "--class", "vendor",
    ]);
    let (_, m) = matches.subcommand().unwrap();
    assert!(keywords::handle(&conn, m).is_err());
}
