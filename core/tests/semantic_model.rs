//! Semantic model coverage and the config pass-through interface.

use bankmart_core::{
    schema,
    semantic::{
        warehouse_semantic_model, ConfigSink, DirectoryConfigSink, SEMANTIC_MODEL_VERSION,
    },
};

#[test]
fn every_documented_table_exists_in_the_physical_schema() {
    let model = warehouse_semantic_model();
    for table in &model.tables {
        assert!(
            schema::table_def(&table.table).is_some(),
            "semantic model documents unknown table '{}'",
            table.table
        );
    }
}

#[test]
fn every_dimension_and_fact_is_documented() {
    let model = warehouse_semantic_model();
    for def in schema::TABLES {
        match def.kind {
            schema::TableKind::Dimension | schema::TableKind::Fact => {
                assert!(
                    model.table(def.name).is_some(),
                    "table '{}' missing from the semantic model",
                    def.name
                );
            }
            // Staging and audit tables are internal plumbing.
            _ => {}
        }
    }
}

#[test]
fn relationships_reference_documented_schema() {
    let model = warehouse_semantic_model();
    for rel in &model.relationships {
        assert!(
            schema::table_def(&rel.from_table).is_some(),
            "relationship '{}' names unknown table '{}'",
            rel.name,
            rel.from_table
        );
        assert!(
            schema::table_def(&rel.to_table).is_some(),
            "relationship '{}' names unknown table '{}'",
            rel.name,
            rel.to_table
        );
    }
}

#[test]
fn model_serializes_and_round_trips() {
    let model = warehouse_semantic_model();
    let json = model.to_json().unwrap();
    let parsed: bankmart_core::semantic::SemanticModel = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.name, "bankmart");
    assert_eq!(parsed.version, SEMANTIC_MODEL_VERSION);
    assert_eq!(parsed.tables.len(), model.tables.len());
}

#[test]
fn directory_sink_writes_the_document_and_returns_a_handle() {
    let dir = tempfile::tempdir().unwrap();
    let sink = DirectoryConfigSink::new(dir.path());
    let model = warehouse_semantic_model();
    let payload = serde_json::to_value(&model).unwrap();

    let handle = sink
        .submit("semantic_model", SEMANTIC_MODEL_VERSION, &payload)
        .unwrap();
    assert_eq!(handle.kind, "semantic_model");
    assert!(!handle.handle_id.is_empty());

    let written = dir
        .path()
        .join(format!("semantic_model-{SEMANTIC_MODEL_VERSION}.json"));
    assert!(written.is_file(), "document must land on disk");
    let content = std::fs::read_to_string(written).unwrap();
    assert!(content.contains("fact_transactions"));
}
