// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as pretty JSON")
}

fn jsonl_flag() -> Arg {
    Arg::new("jsonl")
        .long("jsonl")
        .action(ArgAction::SetTrue)
        .conflicts_with("json")
        .help("Output one JSON object per line")
}

fn project_opt() -> Arg {
    Arg::new("project")
        .long("project")
        .short('p')
        .required(true)
        .help("Project id or exact name")
}

fn project_pos() -> Arg {
    Arg::new("project")
        .required(true)
        .help("Project id or exact name")
}

fn text(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(long).help(help)
}

/// Money or quantity input; negative values reach the validator instead of
/// being read as flags.
fn amount(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    text(id, long, help).allow_negative_numbers(true)
}

fn entry_id() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn paging_args() -> [Arg; 3] {
    [
        text("order", "order", "Sort by date: asc|desc (default desc)"),
        Arg::new("limit")
            .long("limit")
            .value_parser(value_parser!(usize)),
        Arg::new("offset")
            .long("offset")
            .value_parser(value_parser!(usize)),
    ]
}

/// Filters shared by `tx list`, `report ledger` and `report summary`.
/// Malformed values are ignored rather than rejected.
fn tx_filter_args() -> [Arg; 9] {
    [
        text("date", "date", "Only entries on this date (YYYY-MM-DD)"),
        text("from", "from", "Earliest date, inclusive"),
        text("to", "to", "Latest date, inclusive"),
        text("notes", "notes", "Notes contain this text (case-insensitive)"),
        text("category", "category", "Exact category, or 'all'"),
        text("credit_min", "credit-min", "Minimum credit"),
        text("credit_max", "credit-max", "Maximum credit"),
        text("debit_min", "debit-min", "Minimum debit"),
        text("debit_max", "debit-max", "Maximum debit"),
    ]
}

fn record_filter_args() -> [Arg; 12] {
    [
        text("from", "from", "Earliest date, inclusive"),
        text("to", "to", "Latest date, inclusive"),
        text("description", "description", "Description contains this text"),
        text("category", "category", "Contractor|Vendor|Supplier"),
        text("trade", "trade", "Trade contains this text"),
        text("unit", "unit", "Unit contains this text"),
        text("rate_min", "rate-min", "Minimum unit rate"),
        text("rate_max", "rate-max", "Maximum unit rate"),
        text("qty_min", "qty-min", "Minimum quantity"),
        text("qty_max", "qty-max", "Maximum quantity"),
        text("total_min", "total-min", "Minimum total amount"),
        text("total_max", "total-max", "Maximum total amount"),
    ]
}

fn project_fields(cmd: Command) -> Command {
    cmd.arg(text("location", "location", "Site location"))
        .arg(text("description", "description", "Free-text description"))
        .arg(amount("contractor_cost", "contractor-cost", "Contractor cost"))
        .arg(amount("material_cost", "material-cost", "Material cost"))
        .arg(amount("budget", "budget", "Approved budget"))
}

fn project_cmd() -> Command {
    Command::new("project")
        .about("Manage construction projects")
        .subcommand(project_fields(
            Command::new("add")
                .about("Create a project")
                .arg(Arg::new("name").long("name").required(true)),
        ))
        .subcommand(
            Command::new("list")
                .about("List projects with total cost and variance")
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("show")
                .about("Show one project")
                .arg(project_pos())
                .arg(json_flag()),
        )
        .subcommand(project_fields(
            Command::new("edit")
                .about("Change project fields")
                .arg(project_pos())
                .arg(text("name", "name", "New name")),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a project with its transactions and records")
                .arg(project_pos()),
        )
        .subcommand(
            Command::new("refresh-costs")
                .about("Recompute contractor and material cost from financial records")
                .arg(project_pos()),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and list ledger transactions")
        .subcommand(
            Command::new("add")
                .about("Add a credit/debit entry")
                .arg(project_opt())
                .arg(Arg::new("date").long("date").required(true))
                .arg(text("notes", "notes", "Notes"))
                .arg(text("category", "category", "Free-text category"))
                .arg(amount("credit", "credit", "Money received"))
                .arg(amount("debit", "debit", "Money spent")),
        )
        .subcommand(
            Command::new("list")
                .about("List a project's transactions")
                .arg(project_opt())
                .args(tx_filter_args())
                .args(paging_args())
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("edit")
                .about("Change a transaction")
                .arg(entry_id())
                .arg(text("date", "date", "New date"))
                .arg(text("notes", "notes", "New notes"))
                .arg(text("category", "category", "New category"))
                .arg(amount("credit", "credit", "New credit"))
                .arg(amount("debit", "debit", "New debit")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(entry_id()),
        )
        .subcommand(
            Command::new("rebalance")
                .about("Rewrite stored balances from the ledger")
                .arg(project_opt()),
        )
}

fn record_cmd() -> Command {
    Command::new("record")
        .about("Manage contractor, vendor and supplier records")
        .subcommand(
            Command::new("add")
                .about("Add a financial record")
                .arg(project_opt())
                .arg(Arg::new("date").long("date").required(true))
                .arg(text("description", "description", "Description"))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .help("Contractor|Vendor|Supplier"),
                )
                .arg(text("trade", "trade", "Trade"))
                .arg(text("unit", "unit", "Unit of measure"))
                .arg(amount("rate", "rate", "Unit rate price").required(true))
                .arg(amount("qty", "qty", "Quantity").required(true)),
        )
        .subcommand(
            Command::new("list")
                .about("List records with a summary of the matches")
                .arg(project_opt())
                .args(record_filter_args())
                .args(paging_args())
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("edit")
                .about("Change a record; the total is recomputed")
                .arg(entry_id())
                .arg(text("date", "date", "New date"))
                .arg(text("description", "description", "New description"))
                .arg(text("category", "category", "New category"))
                .arg(text("trade", "trade", "New trade"))
                .arg(text("unit", "unit", "New unit"))
                .arg(amount("rate", "rate", "New unit rate"))
                .arg(amount("qty", "qty", "New quantity")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a record")
                .arg(entry_id()),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Project ledger reports")
        .subcommand(
            Command::new("ledger")
                .about("Transactions with running balance")
                .arg(project_opt())
                .args(tx_filter_args())
                .arg(json_flag())
                .arg(jsonl_flag()),
        )
        .subcommand(
            Command::new("summary")
                .about("Credit, debit and balance totals")
                .arg(project_opt())
                .args(tx_filter_args())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("categories")
                .about("Distinct transaction categories")
                .arg(project_opt())
                .arg(json_flag()),
        )
}

fn keywords_cmd() -> Command {
    let class = || {
        Arg::new("class")
            .long("class")
            .help("contractor|supplier")
    };
    Command::new("keywords")
        .about("Category keywords used by the dashboard")
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(
            Command::new("add")
                .arg(Arg::new("keyword").required(true))
                .arg(class().required(true)),
        )
        .subcommand(
            Command::new("rm")
                .arg(Arg::new("keyword").required(true))
                .arg(class()),
        )
        .subcommand(Command::new("reset").about("Restore the built-in keywords"))
}

fn export_target(name: &'static str) -> Command {
    Command::new(name)
        .arg(project_opt())
        .arg(
            Arg::new("format")
                .long("format")
                .default_value("csv")
                .help("csv|json"),
        )
        .arg(Arg::new("out").long("out").required(true))
}

pub fn build_cli() -> Command {
    Command::new("sitebook")
        .about("Construction project ledger: budgets, cashbook and cost records")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("More log output on stderr (-v, -vv, -vvv)"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite database path (default: $SITEBOOK_DB or the data dir)"),
        )
        .subcommand(
            Command::new("init")
                .about("Create the database")
                .arg(text("currency_label", "currency-label", "Label shown before amounts")),
        )
        .subcommand(project_cmd())
        .subcommand(tx_cmd())
        .subcommand(record_cmd())
        .subcommand(report_cmd())
        .subcommand(
            Command::new("dashboard")
                .about("Project, contractor and supplier totals")
                .arg(json_flag()),
        )
        .subcommand(keywords_cmd())
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions")
                    .about("Import date,notes,category,credit,debit rows")
                    .arg(project_opt())
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export")
                .subcommand(export_target("transactions"))
                .subcommand(export_target("records")),
        )
        .subcommand(
            Command::new("seed")
                .about("Load the demo projects and cashbook")
                .arg(
                    Arg::new("reset")
                        .long("reset")
                        .action(ArgAction::SetTrue)
                        .help("Delete existing projects first"),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Report stale balances and drifted totals")
                .arg(json_flag()),
        )
}
