//! Physical schema of the warehouse.
//!
//! Every table is described by a [`TableDef`] in [`TABLES`], listed in
//! dependency order: staging, then dimensions (geography before branch,
//! branch before banker, and so on), then facts, then the load audit.
//! The bulk loader and the store both work off this registry; nothing
//! else in the crate hand-writes table DDL.
//!
//! REFERENCES clauses are declarative documentation of the star schema.
//! The foreign-key pragma stays off on warehouse connections so that
//! replace-style loads are order-tolerant; referential integrity is
//! enforced by the post-load checker instead.

/// Sentinel expiry date marking the open (current) record of an SCD span.
pub const OPEN_ENDED_EXPIRY: &str = "9999-12-31";

/// Suffix for the shadow table a load builds before swapping it in.
pub const SHADOW_SUFFIX: &str = "__incoming";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Staging,
    Dimension,
    Fact,
    Audit,
}

pub struct TableDef {
    pub name: &'static str,
    pub kind: TableKind,
    create_body: &'static str,
    /// Columns the bulk loader populates, in source-file column order.
    /// Excludes auto-assigned keys and `created_at`.
    pub load_columns: &'static [&'static str],
}

impl TableDef {
    /// CREATE TABLE statement for `table_name` (the real table or a shadow).
    pub fn create_sql(&self, table_name: &str) -> String {
        format!("CREATE TABLE {} (\n{}\n)", table_name, self.create_body)
    }

    pub fn insert_sql(&self, table_name: &str) -> String {
        let placeholders = (1..=self.load_columns.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table_name,
            self.load_columns.join(", "),
            placeholders
        )
    }

    pub fn shadow_name(&self) -> String {
        format!("{}{}", self.name, SHADOW_SUFFIX)
    }
}

/// All warehouse tables in creation/load dependency order.
pub static TABLES: &[TableDef] = &[
    // ── Staging ────────────────────────────────────────────────
    TableDef {
        name: "stg_call_center_logs",
        kind: TableKind::Staging,
        create_body: "    log_id                TEXT,
    call_timestamp        TEXT,
    csr_id                TEXT,
    customer_id           TEXT,
    call_duration_seconds TEXT,
    transcript            TEXT,
    created_at            TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "log_id",
            "call_timestamp",
            "csr_id",
            "customer_id",
            "call_duration_seconds",
            "transcript",
        ],
    },
    TableDef {
        name: "stg_marketing_documents",
        kind: TableKind::Staging,
        create_body: "    document_id   TEXT,
    document_name TEXT,
    chunk_index   TEXT,
    chunk_text    TEXT,
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &["document_id", "document_name", "chunk_index", "chunk_text"],
    },
    // ── Dimensions ─────────────────────────────────────────────
    TableDef {
        name: "dim_geography",
        kind: TableKind::Dimension,
        create_body: "    geography_key INTEGER PRIMARY KEY,
    city          TEXT NOT NULL,
    state         TEXT NOT NULL,
    region        TEXT NOT NULL,
    country       TEXT NOT NULL,
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &["geography_key", "city", "state", "region", "country"],
    },
    TableDef {
        name: "dim_branch",
        kind: TableKind::Dimension,
        create_body: "    branch_key    INTEGER PRIMARY KEY,
    branch_id     TEXT NOT NULL UNIQUE,
    branch_name   TEXT NOT NULL,
    branch_type   TEXT NOT NULL,
    geography_key INTEGER REFERENCES dim_geography(geography_key),
    open_date     TEXT,
    created_at    TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "branch_key",
            "branch_id",
            "branch_name",
            "branch_type",
            "geography_key",
            "open_date",
        ],
    },
    TableDef {
        name: "dim_private_banker",
        kind: TableKind::Dimension,
        create_body: "    banker_key     INTEGER PRIMARY KEY,
    banker_id      TEXT NOT NULL,
    first_name     TEXT,
    last_name      TEXT,
    branch_key     INTEGER REFERENCES dim_branch(branch_key),
    license_number TEXT,
    specialization TEXT,
    hire_date      TEXT,
    effective_date TEXT,
    expiry_date    TEXT DEFAULT '9999-12-31',
    is_current     INTEGER DEFAULT 1,
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "banker_key",
            "banker_id",
            "first_name",
            "last_name",
            "branch_key",
            "license_number",
            "specialization",
            "hire_date",
            "effective_date",
            "expiry_date",
            "is_current",
        ],
    },
    TableDef {
        name: "dim_customer",
        kind: TableKind::Dimension,
        create_body: "    customer_key     INTEGER PRIMARY KEY,
    customer_id      TEXT NOT NULL,
    first_name       TEXT,
    last_name        TEXT,
    date_of_birth    TEXT,
    email            TEXT,
    phone            TEXT,
    address          TEXT,
    city             TEXT,
    state            TEXT,
    banker_key       INTEGER REFERENCES dim_private_banker(banker_key),
    customer_segment TEXT,
    effective_date   TEXT,
    expiry_date      TEXT DEFAULT '9999-12-31',
    is_current       INTEGER DEFAULT 1,
    created_at       TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "customer_key",
            "customer_id",
            "first_name",
            "last_name",
            "date_of_birth",
            "email",
            "phone",
            "address",
            "city",
            "state",
            "banker_key",
            "customer_segment",
            "effective_date",
            "expiry_date",
            "is_current",
        ],
    },
    TableDef {
        name: "dim_csr",
        kind: TableKind::Dimension,
        create_body: "    csr_key        INTEGER PRIMARY KEY,
    csr_id         TEXT NOT NULL,
    first_name     TEXT,
    last_name      TEXT,
    department     TEXT,
    specialization TEXT,
    hire_date      TEXT,
    effective_date TEXT,
    expiry_date    TEXT DEFAULT '9999-12-31',
    is_current     INTEGER DEFAULT 1,
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "csr_key",
            "csr_id",
            "first_name",
            "last_name",
            "department",
            "specialization",
            "hire_date",
            "effective_date",
            "expiry_date",
            "is_current",
        ],
    },
    TableDef {
        name: "dim_account",
        kind: TableKind::Dimension,
        create_body: "    account_key    INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id     TEXT NOT NULL,
    customer_key   INTEGER REFERENCES dim_customer(customer_key),
    account_type   TEXT NOT NULL,
    open_date      TEXT,
    account_status TEXT,
    effective_date TEXT,
    expiry_date    TEXT DEFAULT '9999-12-31',
    is_current     INTEGER DEFAULT 1,
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "account_id",
            "customer_key",
            "account_type",
            "open_date",
            "account_status",
            "effective_date",
            "expiry_date",
            "is_current",
        ],
    },
    TableDef {
        name: "dim_product",
        kind: TableKind::Dimension,
        create_body: "    product_key      INTEGER PRIMARY KEY,
    product_id       TEXT NOT NULL,
    product_name     TEXT NOT NULL,
    product_category TEXT NOT NULL,
    min_credit_score INTEGER,
    annual_fee       REAL,
    active_flag      INTEGER DEFAULT 1,
    created_at       TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "product_key",
            "product_id",
            "product_name",
            "product_category",
            "min_credit_score",
            "annual_fee",
            "active_flag",
        ],
    },
    TableDef {
        name: "dim_date",
        kind: TableKind::Dimension,
        create_body: "    date_key         INTEGER PRIMARY KEY,
    full_date        TEXT NOT NULL,
    calendar_year    INTEGER NOT NULL,
    calendar_month   INTEGER NOT NULL,
    calendar_day     INTEGER NOT NULL,
    calendar_quarter INTEGER NOT NULL,
    day_of_week      INTEGER NOT NULL,
    day_name         TEXT NOT NULL,
    month_name       TEXT NOT NULL,
    is_weekend       INTEGER NOT NULL,
    fiscal_year      INTEGER NOT NULL,
    fiscal_quarter   INTEGER NOT NULL,
    created_at       TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "date_key",
            "full_date",
            "calendar_year",
            "calendar_month",
            "calendar_day",
            "calendar_quarter",
            "day_of_week",
            "day_name",
            "month_name",
            "is_weekend",
            "fiscal_year",
            "fiscal_quarter",
        ],
    },
    // ── Facts ──────────────────────────────────────────────────
    TableDef {
        name: "fact_transactions",
        kind: TableKind::Fact,
        create_body: "    transaction_key      INTEGER PRIMARY KEY,
    account_key          INTEGER REFERENCES dim_account(account_key),
    customer_key         INTEGER REFERENCES dim_customer(customer_key),
    branch_key           INTEGER REFERENCES dim_branch(branch_key),
    transaction_date_key INTEGER REFERENCES dim_date(date_key),
    transaction_ts       TEXT,
    transaction_type     TEXT,
    amount               REAL,
    balance_after        REAL,
    is_anomalous         INTEGER DEFAULT 0,
    created_at           TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "transaction_key",
            "account_key",
            "customer_key",
            "branch_key",
            "transaction_date_key",
            "transaction_ts",
            "transaction_type",
            "amount",
            "balance_after",
            "is_anomalous",
        ],
    },
    TableDef {
        name: "fact_credit_card",
        kind: TableKind::Fact,
        create_body: "    card_snapshot_key INTEGER PRIMARY KEY,
    customer_key      INTEGER REFERENCES dim_customer(customer_key),
    product_key       INTEGER REFERENCES dim_product(product_key),
    snapshot_date_key INTEGER REFERENCES dim_date(date_key),
    card_balance      REAL,
    credit_limit      REAL,
    rewards_points    INTEGER,
    created_at        TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "card_snapshot_key",
            "customer_key",
            "product_key",
            "snapshot_date_key",
            "card_balance",
            "credit_limit",
            "rewards_points",
        ],
    },
    TableDef {
        name: "fact_credit_scores",
        kind: TableKind::Fact,
        create_body: "    score_key      INTEGER PRIMARY KEY,
    customer_key   INTEGER REFERENCES dim_customer(customer_key),
    score_date_key INTEGER REFERENCES dim_date(date_key),
    credit_score   INTEGER,
    risk_category  TEXT,
    created_at     TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "score_key",
            "customer_key",
            "score_date_key",
            "credit_score",
            "risk_category",
        ],
    },
    TableDef {
        name: "fact_csr_interactions",
        kind: TableKind::Fact,
        create_body: "    interaction_key       INTEGER PRIMARY KEY,
    csr_key               INTEGER REFERENCES dim_csr(csr_key),
    customer_key          INTEGER REFERENCES dim_customer(customer_key),
    interaction_date_key  INTEGER REFERENCES dim_date(date_key),
    call_duration_seconds INTEGER,
    positive_count        INTEGER,
    neutral_count         INTEGER,
    negative_count        INTEGER,
    sentiment_label       TEXT,
    sentiment_detail      TEXT,
    created_at            TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "interaction_key",
            "csr_key",
            "customer_key",
            "interaction_date_key",
            "call_duration_seconds",
            "positive_count",
            "neutral_count",
            "negative_count",
            "sentiment_label",
            "sentiment_detail",
        ],
    },
    TableDef {
        name: "fact_loans",
        kind: TableKind::Fact,
        create_body: "    loan_key             INTEGER PRIMARY KEY,
    customer_key         INTEGER REFERENCES dim_customer(customer_key),
    product_key          INTEGER REFERENCES dim_product(product_key),
    branch_key           INTEGER REFERENCES dim_branch(branch_key),
    application_date_key INTEGER REFERENCES dim_date(date_key),
    decision_date_key    INTEGER REFERENCES dim_date(date_key),
    loan_amount          REAL,
    interest_rate        REAL,
    term_months          INTEGER,
    loan_status          TEXT,
    created_at           TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[
            "loan_key",
            "customer_key",
            "product_key",
            "branch_key",
            "application_date_key",
            "decision_date_key",
            "loan_amount",
            "interest_rate",
            "term_months",
            "loan_status",
        ],
    },
    // ── Audit ──────────────────────────────────────────────────
    TableDef {
        name: "load_audit",
        kind: TableKind::Audit,
        create_body: "    audit_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id       TEXT NOT NULL,
    table_name   TEXT NOT NULL,
    source_file  TEXT,
    rows_loaded  INTEGER NOT NULL DEFAULT 0,
    rows_skipped INTEGER NOT NULL DEFAULT 0,
    status       TEXT NOT NULL,
    error        TEXT,
    started_at   TEXT NOT NULL DEFAULT (datetime('now'))",
        load_columns: &[],
    },
];

/// Look up a table definition by name.
pub fn table_def(name: &str) -> Option<&'static TableDef> {
    TABLES.iter().find(|t| t.name == name)
}

/// Tables the bulk loader may target (everything except the audit log).
pub fn loadable_tables() -> impl Iterator<Item = &'static TableDef> {
    TABLES.iter().filter(|t| t.kind != TableKind::Audit)
}

/// Declared fact→dimension references, used by the integrity checker.
/// `(fact table, fact column, dimension table, dimension key)`.
pub static FACT_REFERENCES: &[(&str, &str, &str, &str)] = &[
    ("fact_transactions", "account_key", "dim_account", "account_key"),
    ("fact_transactions", "customer_key", "dim_customer", "customer_key"),
    ("fact_transactions", "branch_key", "dim_branch", "branch_key"),
    ("fact_transactions", "transaction_date_key", "dim_date", "date_key"),
    ("fact_credit_card", "customer_key", "dim_customer", "customer_key"),
    ("fact_credit_card", "product_key", "dim_product", "product_key"),
    ("fact_credit_card", "snapshot_date_key", "dim_date", "date_key"),
    ("fact_credit_scores", "customer_key", "dim_customer", "customer_key"),
    ("fact_credit_scores", "score_date_key", "dim_date", "date_key"),
    ("fact_csr_interactions", "csr_key", "dim_csr", "csr_key"),
    ("fact_csr_interactions", "customer_key", "dim_customer", "customer_key"),
    (
        "fact_csr_interactions",
        "interaction_date_key",
        "dim_date",
        "date_key",
    ),
    ("fact_loans", "customer_key", "dim_customer", "customer_key"),
    ("fact_loans", "product_key", "dim_product", "product_key"),
    ("fact_loans", "branch_key", "dim_branch", "branch_key"),
    ("fact_loans", "application_date_key", "dim_date", "date_key"),
    ("fact_loans", "decision_date_key", "dim_date", "date_key"),
];

/// SCD-tracked dimensions and their natural-key column, used by the
/// integrity checker's current-row uniqueness test.
pub static SCD_DIMENSIONS: &[(&str, &str)] = &[
    ("dim_private_banker", "banker_id"),
    ("dim_customer", "customer_id"),
    ("dim_csr", "csr_id"),
    ("dim_account", "account_id"),
];
