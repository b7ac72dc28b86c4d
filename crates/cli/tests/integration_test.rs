use schema_doctor::config::Config;
use schema_doctor::detector::{run, Overrides};
use schema_doctor::model::ModelSet;
use schema_doctor::report::{DetectorReport, SuiteReport};
use schema_doctor::schema::SchemaSnapshot;
use schema_doctor_detectors::{all_detectors, default_registry};

fn shop_schema() -> SchemaSnapshot {
    SchemaSnapshot::from_json(include_str!("fixtures/shop_schema.json")).unwrap()
}

fn shop_models() -> ModelSet {
    ModelSet::from_toml(include_str!("fixtures/models.toml")).unwrap()
}

fn check(schema: &SchemaSnapshot, config: &Config) -> Vec<DetectorReport> {
    let registry = default_registry().unwrap();
    config.validate(&registry).unwrap();
    registry
        .run_all(schema, shop_models().as_slice(), config)
        .into_iter()
        .map(|outcome| outcome.unwrap())
        .collect()
}

fn messages<'a>(reports: &'a [DetectorReport], detector: &str) -> Vec<&'a str> {
    reports
        .iter()
        .find(|r| r.detector == detector)
        .unwrap_or_else(|| panic!("{detector} did not run"))
        .problems
        .iter()
        .map(|p| p.message.as_str())
        .collect()
}

#[test]
fn test_shop_schema_problems() {
    let reports = check(&shop_schema(), &Config::default());
    assert_eq!(reports.len(), all_detectors().len());

    assert_eq!(
        messages(&reports, "extraneous_indexes"),
        vec![
            "remove index_orders_on_user_id - can be replaced by index_orders_on_user_id_and_created_at",
            "remove index_users_on_id - coincides with the primary key on the table",
        ]
    );
    assert_eq!(
        messages(&reports, "mismatched_foreign_key_type"),
        vec!["orders.user_id is a foreign key of type integer and references users.id of type bigint - foreign keys should be of the same type as the referenced column"]
    );
    assert_eq!(
        messages(&reports, "missing_foreign_keys"),
        vec!["create a foreign key on audit_logs.account_id - looks like an association without a foreign key constraint"]
    );
    assert_eq!(
        messages(&reports, "short_primary_key_type"),
        vec!["change the type of orders.id from integer to bigint"]
    );
    assert_eq!(
        messages(&reports, "table_without_primary_key"),
        vec![
            "add a primary key to audit_logs",
            "add a primary key to schema_migrations",
        ]
    );
    assert_eq!(
        messages(&reports, "table_without_timestamps"),
        vec![
            "add a updated_at timestamp column to audit_logs",
            "add a created_at timestamp column to schema_migrations",
            "add a updated_at timestamp column to schema_migrations",
        ]
    );
    assert_eq!(
        messages(&reports, "undefined_table_references"),
        vec!["LegacyEntry references a non-existent table or view named legacy_entries"]
    );
    assert_eq!(
        messages(&reports, "unindexed_deleted_at"),
        vec!["consider adding `WHERE deleted_at IS NULL` or `WHERE deleted_at IS NOT NULL` to index_products_on_name - a partial index can speed lookups of soft-deletable models"]
    );
    assert_eq!(
        messages(&reports, "unindexed_foreign_keys"),
        vec!["add an index on audit_logs.account_id - foreign keys are often used in database lookups and should be indexed for performance reasons"]
    );
}

#[test]
fn test_suite_report_summary() {
    let schema = shop_schema();
    let report = SuiteReport::from_reports(&schema, check(&schema, &Config::default()));

    assert!(!report.success);
    assert_eq!(report.backend, "postgresql");
    assert_eq!(report.tables_analyzed, 6);
    assert_eq!(report.detectors_run, 9);
    assert_eq!(report.total_problems, 13);
    assert_eq!(report.failed().count(), 9);
    assert_eq!(report.schema_fingerprint, schema.fingerprint());

    let json = serde_json::to_value(&report).unwrap();
    let first = &json["reports"][0]["problems"][0];
    assert_eq!(first["attributes"]["table"], "orders");
    assert_eq!(first["attributes"]["reason"], "multi_column");
    assert_eq!(
        first["attributes"]["replacement_indexes"][0],
        "index_orders_on_user_id_and_created_at"
    );
}

#[test]
fn test_default_config_ignores_framework_tables() {
    let config = Config::from_toml(Config::default_toml()).unwrap();
    let reports = check(&shop_schema(), &config);

    assert_eq!(
        messages(&reports, "table_without_primary_key"),
        vec!["add a primary key to audit_logs"]
    );
    assert_eq!(
        messages(&reports, "table_without_timestamps"),
        vec!["add a updated_at timestamp column to audit_logs"]
    );
}

#[test]
fn test_config_disables_and_tunes_detectors() {
    let toml = r#"
[detectors.extraneous_indexes]
enabled = false

[detectors.unindexed_foreign_keys]
ignore_columns = ["audit_logs.*"]

[detectors.undefined_table_references]
ignore_models = ["Legacy*"]

[detectors.unindexed_deleted_at]
column_names = ["discarded_at"]
"#;
    let config = Config::from_toml(toml).unwrap();
    let reports = check(&shop_schema(), &config);

    assert_eq!(reports.len(), all_detectors().len() - 1);
    assert!(reports.iter().all(|r| r.detector != "extraneous_indexes"));
    assert!(messages(&reports, "unindexed_foreign_keys").is_empty());
    assert!(messages(&reports, "undefined_table_references").is_empty());
    assert!(messages(&reports, "unindexed_deleted_at").is_empty());
    // Untouched detectors keep their problems.
    assert_eq!(messages(&reports, "missing_foreign_keys").len(), 1);
}

#[test]
fn test_config_rejects_unknown_names() {
    let registry = default_registry().unwrap();

    let config = Config::from_toml("[detectors.unused_indexes]\nenabled = false\n").unwrap();
    assert!(config.validate(&registry).is_err());

    let config = Config::from_toml("[detectors.table_without_primary_key]\nignore_models = []\n").unwrap();
    assert!(config.validate(&registry).is_err());

    let config = Config::from_toml("[global]\nignore_things = []\n").unwrap();
    assert!(config.validate(&registry).is_err());
}

#[test]
fn test_runs_are_deterministic() {
    let schema = shop_schema();
    let render = |reports: Vec<DetectorReport>| -> Vec<String> {
        reports
            .into_iter()
            .flat_map(|r| r.problems.into_iter().map(|p| p.message))
            .collect()
    };
    let first = render(check(&schema, &Config::default()));
    let second = render(check(&schema, &Config::default()));
    assert_eq!(first, second);
}

#[test]
fn test_unsupported_views_skip_model_check() {
    let schema = shop_schema().without_view_introspection();
    let reports = check(&schema, &Config::default());
    assert!(messages(&reports, "undefined_table_references").is_empty());
}

#[test]
fn test_single_detector_writes_lines() {
    let registry = default_registry().unwrap();
    let detector = registry.get("table_without_primary_key").unwrap();

    let mut sink: Vec<String> = Vec::new();
    let success = run(detector, &Overrides::new(), &shop_schema(), &[], &mut sink).unwrap();

    assert!(!success);
    assert_eq!(
        sink,
        vec![
            "add a primary key to audit_logs",
            "add a primary key to schema_migrations",
        ]
    );
}

#[test]
fn test_snapshot_round_trips_through_disk() {
    let schema = shop_schema();
    let path = std::env::temp_dir().join(format!("schema-doctor-{}.json", std::process::id()));
    schema.save(&path).unwrap();
    let loaded = SchemaSnapshot::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, schema);
    assert_eq!(loaded.fingerprint(), schema.fingerprint());
}
