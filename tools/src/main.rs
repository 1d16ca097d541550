//! mart-runner: batch provisioning runner for the BankMart warehouse.
//!
//! Usage:
//!   mart-runner --db warehouse.db --data-dir ./data
//!   mart-runner --db warehouse.db --data-dir ./data --config mart.json \
//!               --strict --semantic-out ./export --notify ops@example.com

use anyhow::Result;
use bankmart_core::{
    config::LoadConfig,
    loader::TableOutcome,
    notify::{deliver, LogGateway},
    pipeline::{ProvisionReport, Provisioner},
    semantic::{warehouse_semantic_model, ConfigSink, DirectoryConfigSink, SEMANTIC_MODEL_VERSION},
    store::WarehouseStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = str_arg(&args, "--db").unwrap_or("warehouse.db");
    let data_dir = str_arg(&args, "--data-dir").unwrap_or("./data");
    let config_path = str_arg(&args, "--config");
    let semantic_out = str_arg(&args, "--semantic-out");
    let notify_to = str_arg(&args, "--notify");
    let strict = args.iter().any(|a| a == "--strict");

    let mut config = match config_path {
        Some(p) => LoadConfig::load(p)?,
        None => LoadConfig::default(),
    };
    if strict {
        config.strict_referential = true;
    }

    println!("BankMart — mart-runner");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!("  strict:    {strict}");
    println!();

    let store = WarehouseStore::open(db)?;
    let report = Provisioner::new(&store, data_dir, config).run()?;
    print_summary(&report);

    if let Some(dir) = semantic_out {
        let model = warehouse_semantic_model();
        let sink = DirectoryConfigSink::new(dir);
        let handle = sink.submit(
            "semantic_model",
            SEMANTIC_MODEL_VERSION,
            &serde_json::to_value(&model)?,
        )?;
        println!();
        println!("semantic model submitted: handle {}", handle.handle_id);
    }

    if let Some(recipient) = notify_to {
        let outcome = deliver(
            &LogGateway,
            recipient,
            "BankMart load summary",
            &summary_html(&report),
        );
        println!();
        println!("{outcome}");
    }

    Ok(())
}

fn print_summary(report: &ProvisionReport) {
    println!("=== LOAD SUMMARY ({}) ===", report.run_id);
    for outcome in &report.load.tables {
        match outcome {
            TableOutcome::Loaded(r) => {
                println!(
                    "  {:<28} {:>8} rows loaded, {:>4} skipped",
                    r.table, r.rows_loaded, r.rows_skipped
                );
            }
            TableOutcome::Failed { table, error, .. } => {
                println!("  {table:<28} FAILED: {error}");
            }
        }
    }
    if let Some(rows) = report.date_rows_generated {
        println!("  {:<28} {rows:>8} rows generated", "dim_date");
    }

    println!();
    if report.violations.is_empty() {
        println!("integrity: clean");
    } else {
        println!("integrity: {} violation(s)", report.violations.len());
        for v in &report.violations {
            println!("  - {v}");
        }
    }
}

fn summary_html(report: &ProvisionReport) -> String {
    let mut rows = String::new();
    for outcome in &report.load.tables {
        match outcome {
            TableOutcome::Loaded(r) => rows.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                r.table, r.rows_loaded, r.rows_skipped
            )),
            TableOutcome::Failed { table, error, .. } => rows.push_str(&format!(
                "<tr><td>{table}</td><td colspan=\"2\">FAILED: {error}</td></tr>"
            )),
        }
    }
    format!(
        "<h2>BankMart load {}</h2>\
         <table><tr><th>Table</th><th>Loaded</th><th>Skipped</th></tr>{rows}</table>\
         <p>{} integrity violation(s)</p>",
        report.run_id,
        report.violations.len()
    )
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
