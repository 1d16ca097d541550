//! End-to-end provisioning runs: schema, loads, generated dates, views,
//! audit trail, and integrity — the whole batch in one pass.

use bankmart_core::{
    config::{DateRangeConfig, LoadConfig},
    pipeline::Provisioner,
    store::WarehouseStore,
};
use chrono::NaiveDate;
use std::path::Path;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn write_fixture_set(dir: &Path) {
    let files: &[(&str, &str)] = &[
        (
            "call_center_logs.csv",
            "\
log_id,call_timestamp,csr_id,customer_id,call_duration_seconds,transcript
LOG-1,2023-01-20 10:15:00,CSR-1,CUST-1,240,\"Asked about card limits, satisfied with the answer.\"
",
        ),
        (
            "marketing_documents.csv",
            "\
document_id,document_name,chunk_index,chunk_text
DOC-1,gold_card_brochure.pdf,0,The Gold Card offers travel rewards on every purchase.
",
        ),
        (
            "geography.csv",
            "\
geography_key,city,state,region,country
1,New York,NY,Northeast,USA
",
        ),
        (
            "branches.csv",
            "\
branch_key,branch_id,branch_name,branch_type,geography_key,open_date
1,BR-1,Midtown,full_service,1,2001-02-03
",
        ),
        (
            "private_bankers.csv",
            "\
banker_key,banker_id,first_name,last_name,branch_key,license_number,specialization,hire_date,effective_date,expiry_date,is_current
1,PB-1,Marie,Curie,1,LIC-778,wealth_management,2015-09-01,2015-09-01,9999-12-31,1
",
        ),
        (
            "customers.csv",
            "\
customer_key,customer_id,first_name,last_name,date_of_birth,email,phone,address,city,state,banker_key,customer_segment,effective_date,expiry_date,is_current
1,CUST-1,Ada,Lovelace,1980-01-01,ada@example.com,,,New York,NY,1,premium,2020-01-01,9999-12-31,1
",
        ),
        (
            "csrs.csv",
            "\
csr_key,csr_id,first_name,last_name,department,specialization,hire_date,effective_date,expiry_date,is_current
1,CSR-1,Grace,Hopper,cards,disputes,2018-05-01,2018-05-01,9999-12-31,1
",
        ),
        (
            "accounts.csv",
            "\
account_id,customer_key,account_type,open_date,account_status,effective_date,expiry_date,is_current
ACC-1,1,current,2020-01-05,open,2020-01-05,9999-12-31,1
",
        ),
        (
            "products.csv",
            "\
product_key,product_id,product_name,product_category,min_credit_score,annual_fee,active_flag
1,PRD-GOLD-CC,Gold Card,credit_card,680,95,1
2,PRD-HOME-LOAN,Home Loan,loan,700,0,1
",
        ),
        (
            "transactions.csv",
            "\
transaction_key,account_key,customer_key,branch_key,transaction_date_key,transaction_ts,transaction_type,amount,balance_after,is_anomalous
1,1,1,1,20230105,2023-01-05 09:00:00,DEPOSIT,500,500,0
2,1,1,1,20230112,2023-01-12 14:30:00,WITHDRAWAL,200,300,1
",
        ),
        (
            "credit_card_snapshots.csv",
            "\
card_snapshot_key,customer_key,product_key,snapshot_date_key,card_balance,credit_limit,rewards_points
1,1,1,20230110,450,2000,90
",
        ),
        (
            "credit_scores.csv",
            "\
score_key,customer_key,score_date_key,credit_score,risk_category
1,1,20230115,712,low
",
        ),
        (
            "csr_interactions.csv",
            "\
interaction_key,csr_key,customer_key,interaction_date_key,call_duration_seconds,positive_count,neutral_count,negative_count,sentiment_label,sentiment_detail
1,1,1,20230120,240,3,1,0,positive,\"{\"\"scores\"\":[0.9,0.7,0.8]}\"
",
        ),
        (
            "loans.csv",
            "\
loan_key,customer_key,product_key,branch_key,application_date_key,decision_date_key,loan_amount,interest_rate,term_months,loan_status
1,1,2,1,20230103,20230110,250000,5.1,360,approved
",
        ),
    ];
    for (name, content) in files {
        std::fs::write(dir.join(name), content).unwrap();
    }
}

fn strict_config() -> LoadConfig {
    let mut config = LoadConfig::default();
    config.strict_referential = true;
    config.date_dimension = Some(DateRangeConfig {
        start_date: d(2023, 1, 1),
        end_date: d(2023, 1, 31),
        fiscal_year_start_month: 1,
    });
    config
}

#[test]
fn full_run_loads_every_table_and_passes_strict_integrity() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_set(dir.path());

    let store = WarehouseStore::in_memory().unwrap();
    let report = Provisioner::new(&store, dir.path(), strict_config())
        .run()
        .unwrap();

    assert_eq!(report.load.failure_count(), 0, "all sources are present");
    assert_eq!(report.date_rows_generated, Some(31));
    assert!(report.violations.is_empty());

    // 14 file loads plus the generated date dimension.
    assert_eq!(store.audit_count(&report.run_id).unwrap(), 15);

    assert_eq!(store.table_row_count("fact_transactions").unwrap(), 2);
    assert_eq!(store.table_row_count("dim_date").unwrap(), 31);

    let balances = store.account_balances().unwrap();
    assert_eq!(balances.len(), 2, "one bank row and one card row");

    let transcripts = store.call_transcripts().unwrap();
    assert_eq!(transcripts.len(), 1);
    let chunks = store.document_chunks().unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].0, "gold_card_brochure.pdf");
}

#[test]
fn missing_source_fails_its_table_but_the_run_completes() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_set(dir.path());
    std::fs::remove_file(dir.path().join("loans.csv")).unwrap();

    let store = WarehouseStore::in_memory().unwrap();
    let mut config = strict_config();
    config.strict_referential = false;

    let report = Provisioner::new(&store, dir.path(), config).run().unwrap();

    assert_eq!(report.load.failure_count(), 1);
    let failed = report
        .load
        .tables
        .iter()
        .find(|t| t.is_failed())
        .expect("one failed outcome");
    assert_eq!(failed.table(), "fact_loans");

    assert_eq!(
        store.table_row_count("fact_transactions").unwrap(),
        2,
        "sibling loads must complete"
    );
    assert_eq!(store.table_row_count("fact_loans").unwrap(), 0);

    // 13 loaded, 1 failed, 1 generated date dimension.
    assert_eq!(store.audit_count(&report.run_id).unwrap(), 15);
}

#[test]
fn rerunning_the_pipeline_reproduces_identical_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_set(dir.path());

    let store = WarehouseStore::in_memory().unwrap();
    let provisioner = Provisioner::new(&store, dir.path(), strict_config());

    provisioner.run().unwrap();
    let txns_first = store.dump_rows("fact_transactions").unwrap();
    let accounts_first = store.dump_rows("dim_account").unwrap();
    let dates_first = store.dump_rows("dim_date").unwrap();

    provisioner.run().unwrap();
    assert_eq!(store.dump_rows("fact_transactions").unwrap(), txns_first);
    assert_eq!(store.dump_rows("dim_account").unwrap(), accounts_first);
    assert_eq!(store.dump_rows("dim_date").unwrap(), dates_first);
}
