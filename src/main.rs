// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::Result;

use sitebook::{cli, commands, db, logging, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init(matches.get_count("verbose"));
    let db_arg = matches.get_one::<String>("db").map(Path::new);
    let mut conn = db::open_or_init(db_arg)?;

    match matches.subcommand() {
        Some(("init", sub)) => {
            if let Some(label) = sub.get_one::<String>("currency_label") {
                utils::set_currency_label(&conn, label)?;
            }
            println!("Database initialized at {}", db::db_path(db_arg)?.display());
        }
        Some(("project", sub)) => commands::projects::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("record", sub)) => commands::records::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&conn, sub)?,
        Some(("keywords", sub)) => commands::keywords::handle(&conn, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("seed", sub)) => commands::seed::handle(&mut conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
