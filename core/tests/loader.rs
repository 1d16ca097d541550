//! Bulk loader behavior: header handling, malformed rows, per-table
//! independence, and reload idempotence.

use bankmart_core::{
    config::LoadConfig,
    error::MartError,
    loader::BulkLoader,
    store::WarehouseStore,
};
use std::path::Path;

fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn fresh_store() -> WarehouseStore {
    let store = WarehouseStore::in_memory().unwrap();
    store.create_tables().unwrap();
    store
}

const CUSTOMERS_CSV: &str = "\
customer_key,customer_id,first_name,last_name,date_of_birth,email,phone,address,city,state,banker_key,customer_segment,effective_date,expiry_date,is_current
1,CUST-1,Ada,Lovelace,1980-01-01,ada@example.com,,,,,,retail,2020-01-01,9999-12-31,1
2,CUST-2,Alan,Turing,1975-06-23,alan@example.com,,,,,,premium,2020-01-01,9999-12-31,1
";

#[test]
fn header_row_is_skipped_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "customers.csv", CUSTOMERS_CSV);

    let store = fresh_store();
    let loader = BulkLoader::new(&store, dir.path(), LoadConfig::default());
    let report = loader.load_table("dim_customer").unwrap();

    assert_eq!(report.rows_loaded, 2, "header must not load as data");
    assert_eq!(store.table_row_count("dim_customer").unwrap(), 2);
}

#[test]
fn malformed_row_is_skipped_without_aborting_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "transactions.csv",
        "\
transaction_key,account_key,customer_key,branch_key,transaction_date_key,transaction_ts,transaction_type,amount,balance_after,is_anomalous
1,1,1,1,20230101,2023-01-01 09:00:00,DEPOSIT,100,100,0
2,1,broken-row
3,1,1,1,20230102,2023-01-02 09:00:00,WITHDRAWAL,40,60,0
",
    );

    let store = fresh_store();
    let loader = BulkLoader::new(&store, dir.path(), LoadConfig::default());
    let report = loader.load_table("fact_transactions").unwrap();

    assert_eq!(report.rows_skipped, 1, "the short row must be skipped");
    assert_eq!(
        report.rows_loaded, 2,
        "rows after the malformed one must still load"
    );
}

#[test]
fn empty_fields_load_as_null() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "customers.csv", CUSTOMERS_CSV);

    let store = fresh_store();
    let loader = BulkLoader::new(&store, dir.path(), LoadConfig::default());
    loader.load_table("dim_customer").unwrap();

    let rows = store.dump_rows("dim_customer").unwrap();
    // phone is load-column index 6
    assert_eq!(rows[0][6], None, "empty phone field should be NULL");
    assert_eq!(rows[0][1].as_deref(), Some("CUST-1"));
}

#[test]
fn missing_source_fails_only_that_table() {
    let dir = tempfile::tempdir().unwrap();
    // Only customers.csv exists; every other source is absent.
    write_file(dir.path(), "customers.csv", CUSTOMERS_CSV);

    let store = fresh_store();
    let loader = BulkLoader::new(&store, dir.path(), LoadConfig::default());
    let run = loader.load_all("run-isolation-test");

    let customer_outcome = run
        .tables
        .iter()
        .find(|t| t.table() == "dim_customer")
        .expect("dim_customer outcome present");
    assert!(
        !customer_outcome.is_failed(),
        "dim_customer must load despite missing siblings"
    );
    assert_eq!(store.table_row_count("dim_customer").unwrap(), 2);
    assert!(
        run.failure_count() > 0,
        "absent sources must be reported as failures"
    );
}

#[test]
fn missing_source_is_a_source_unavailable_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = fresh_store();
    let loader = BulkLoader::new(&store, dir.path(), LoadConfig::default());

    let err = loader.load_table("dim_customer").unwrap_err();
    assert!(
        matches!(err, MartError::SourceUnavailable { .. }),
        "expected SourceUnavailable, got {err:?}"
    );
}

#[test]
fn reloading_unchanged_sources_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "customers.csv", CUSTOMERS_CSV);
    write_file(
        dir.path(),
        "accounts.csv",
        "\
account_id,customer_key,account_type,open_date,account_status,effective_date,expiry_date,is_current
ACC-1,1,current,2020-01-05,open,2020-01-05,9999-12-31,1
ACC-2,2,savings,2021-03-10,open,2021-03-10,9999-12-31,1
",
    );

    let store = fresh_store();
    let loader = BulkLoader::new(&store, dir.path(), LoadConfig::default());

    loader.load_table("dim_customer").unwrap();
    loader.load_table("dim_account").unwrap();
    let customers_first = store.dump_rows("dim_customer").unwrap();
    let accounts_first = store.dump_rows("dim_account").unwrap();

    loader.load_table("dim_customer").unwrap();
    loader.load_table("dim_account").unwrap();
    let customers_second = store.dump_rows("dim_customer").unwrap();
    let accounts_second = store.dump_rows("dim_account").unwrap();

    assert_eq!(
        customers_first, customers_second,
        "reload must reproduce identical dim_customer contents"
    );
    assert_eq!(
        accounts_first, accounts_second,
        "reload must reproduce identical dim_account contents \
         (including auto-assigned surrogate keys)"
    );
}

#[test]
fn unknown_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = fresh_store();
    let loader = BulkLoader::new(&store, dir.path(), LoadConfig::default());

    let err = loader.load_table("dim_nonexistent").unwrap_err();
    assert!(matches!(err, MartError::UnknownTable { .. }));
}

#[test]
fn quoted_fields_with_embedded_commas_load_intact() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "call_center_logs.csv",
        "\
log_id,call_timestamp,csr_id,customer_id,call_duration_seconds,transcript
LOG-1,2023-05-01 10:15:00,CSR-1,CUST-1,240,\"Customer asked about fees, then about limits.\"
",
    );

    let store = fresh_store();
    let loader = BulkLoader::new(&store, dir.path(), LoadConfig::default());
    let report = loader.load_table("stg_call_center_logs").unwrap();
    assert_eq!(report.rows_loaded, 1);

    let transcripts = store.call_transcripts().unwrap();
    assert_eq!(transcripts.len(), 1);
    assert_eq!(
        transcripts[0].1,
        "Customer asked about fees, then about limits.",
        "quoting must preserve the embedded comma"
    );
}
