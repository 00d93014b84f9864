// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal_macros::dec;
use sitebook::commands::records::{self, NewRecord};
use sitebook::commands::{dashboard, doctor, projects, reports, seed, transactions};
use sitebook::ledger::TransactionFilter;
use sitebook::models::RecordCategory;
use sitebook::utils::{currency_label, parse_date};
use sitebook::{cli, db};

#[test]
fn seed_loads_the_demo_cashbook() {
    let mut conn = db::open_in_memory().unwrap();
    let ids = seed::seed(&mut conn, false).unwrap();
    assert_eq!(ids.len(), 3);

    let report = reports::project_report(&conn, ids[0], &TransactionFilter::default()).unwrap();
    assert_eq!(report.project_name, "Sajjad Factory Ansari Chowk Multan");
    assert_eq!(report.summary.entry_count, 15);
    assert_eq!(report.summary.total_credit, dec!(6300));
    assert_eq!(report.summary.total_debit, dec!(7796.11));
    assert_eq!(report.summary.total_balance, dec!(-1496.11));

    let txs = transactions::list_for_project(&conn, ids[0]).unwrap();
    assert_eq!(txs.first().unwrap().category, "Receiving");
    assert_eq!(txs[1].balance, dec!(-1232.06));
    assert_eq!(txs.last().unwrap().balance, dec!(-1496.11));

    let stats = dashboard::stats(&conn).unwrap();
    assert_eq!(stats.total_projects, 3);
    assert_eq!(stats.total_contractors, 3);
    assert_eq!(stats.total_suppliers, 2);
    assert_eq!(stats.total_spent, dec!(1200000));

    assert!(doctor::check(&conn).unwrap().is_empty());
    assert_eq!(currency_label(&conn).unwrap(), "Rs");
}

#[test]
fn seed_refuses_non_empty_database_without_reset() {
    let mut conn = db::open_in_memory().unwrap();
    seed::seed(&mut conn, false).unwrap();
    assert!(seed::seed(&mut conn, false).is_err());

    let matches = cli::build_cli().get_matches_from(["sitebook", "seed", "--reset"]);
    let (_, m) = matches.subcommand().unwrap();
    seed::handle(&mut conn, m).unwrap();
    assert_eq!(projects::list_all(&conn).unwrap().len(), 3);
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 18);
}

#[test]
fn doctor_reports_stale_drifted_and_negative_values() {
    let mut conn = db::open_in_memory().unwrap();
    let ids = seed::seed(&mut conn, false).unwrap();
    let p = ids[1];
    let rec = records::insert(
        &conn,
        &NewRecord {
            project_id: p,
            date: parse_date("2025-08-03").unwrap(),
            description: "Steel".into(),
            category: RecordCategory::Supplier,
            trade: "Steel".into(),
            unit: "ton".into(),
            unit_rate_price: dec!(200),
            qty: dec!(3),
        },
    )
    .unwrap();

    conn.execute(
        "UPDATE transactions SET balance='1' WHERE project_id=?1 AND category='Materials'",
        [p],
    )
    .unwrap();
    conn.execute(
        "UPDATE financial_records SET total_amount='599' WHERE id=?1",
        [rec.id],
    )
    .unwrap();
    conn.execute("UPDATE projects SET budget='-10' WHERE id=?1", [ids[2]])
        .unwrap();

    let issues = doctor::check(&conn).unwrap();
    let kinds: Vec<(&str, i64)> = issues.iter().map(|i| (i.kind, i.project_id)).collect();
    assert_eq!(
        kinds,
        vec![
            ("stale_balance", p),
            ("total_amount_drift", p),
            ("negative_amount", ids[2]),
        ]
    );

    transactions::rebalance(&conn, p).unwrap();
    records::update(&conn, rec.id, &Default::default()).unwrap();
    let issues = doctor::check(&conn).unwrap();
    assert_eq!(issues.len(), 1);
}
