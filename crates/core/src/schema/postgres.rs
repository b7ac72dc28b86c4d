//! Live PostgreSQL introspection.
//!
//! Everything is read from the system catalogs in one pass and returned as a
//! [`SchemaSnapshot`]; detectors never talk to the connection directly.

use std::collections::BTreeMap;

use tokio_postgres::{GenericClient, NoTls, Row};

use super::snapshot::SchemaSnapshot;
use super::types::{Column, ForeignKey, Index, Table};
use crate::error::DoctorResult;

pub const BACKEND: &str = "postgresql";

const TABLES_SQL: &str = r#"
SELECT c.relname::text AS table_name
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p')
ORDER BY c.relname
"#;

const VIEWS_SQL: &str = r#"
SELECT c.relname::text AS view_name
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE n.nspname = $1
  AND c.relkind IN ('v', 'm')
ORDER BY c.relname
"#;

const COLUMNS_SQL: &str = r#"
SELECT
  c.relname::text AS table_name,
  a.attname::text AS column_name,
  pg_catalog.format_type(a.atttypid, a.atttypmod) AS data_type,
  NOT a.attnotnull AS nullable,
  pg_catalog.pg_get_expr(ad.adbin, ad.adrelid) AS default_expr
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid
LEFT JOIN pg_catalog.pg_attrdef ad ON ad.adrelid = c.oid AND ad.adnum = a.attnum
WHERE n.nspname = $1
  AND c.relkind IN ('r', 'p')
  AND a.attnum > 0
  AND NOT a.attisdropped
ORDER BY c.relname, a.attnum
"#;

const PRIMARY_KEYS_SQL: &str = r#"
SELECT
  rel.relname::text AS table_name,
  array_agg(att.attname::text ORDER BY ord.ordinality) AS columns
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class rel ON rel.oid = con.conrelid
JOIN pg_catalog.pg_namespace nsp ON nsp.oid = rel.relnamespace
JOIN unnest(con.conkey) WITH ORDINALITY AS ord(attnum, ordinality) ON true
JOIN pg_catalog.pg_attribute att ON att.attrelid = rel.oid AND att.attnum = ord.attnum
WHERE nsp.nspname = $1
  AND con.contype = 'p'
GROUP BY rel.relname
"#;

const INDEXES_SQL: &str = r#"
SELECT
  t.relname::text AS table_name,
  i.relname::text AS index_name,
  ix.indisunique AS is_unique,
  pg_catalog.pg_get_expr(ix.indpred, ix.indrelid) AS predicate,
  ARRAY(
    SELECT COALESCE(a.attname::text, pg_catalog.pg_get_indexdef(ix.indexrelid, k.ordinality::int, true))
    FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ordinality)
    LEFT JOIN pg_catalog.pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = k.attnum
    WHERE k.ordinality <= ix.indnkeyatts
    ORDER BY k.ordinality
  ) AS columns,
  ix.indexprs IS NOT NULL AS has_expression
FROM pg_catalog.pg_index ix
JOIN pg_catalog.pg_class i ON i.oid = ix.indexrelid
JOIN pg_catalog.pg_class t ON t.oid = ix.indrelid
JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
WHERE n.nspname = $1
  AND NOT ix.indisprimary
ORDER BY t.relname, i.relname
"#;

const FOREIGN_KEYS_SQL: &str = r#"
SELECT
  con.conname::text AS constraint_name,
  src.relname::text AS table_name,
  dst.relname::text AS referenced_table,
  ARRAY(
    SELECT a.attname::text
    FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ordinality)
    JOIN pg_catalog.pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
    ORDER BY k.ordinality
  ) AS columns,
  ARRAY(
    SELECT a.attname::text
    FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ordinality)
    JOIN pg_catalog.pg_attribute a ON a.attrelid = con.confrelid AND a.attnum = k.attnum
    ORDER BY k.ordinality
  ) AS referenced_columns
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class src ON src.oid = con.conrelid
JOIN pg_catalog.pg_class dst ON dst.oid = con.confrelid
JOIN pg_catalog.pg_namespace n ON n.oid = src.relnamespace
WHERE n.nspname = $1
  AND con.contype = 'f'
ORDER BY src.relname, con.conname
"#;

/// Connect to `url` and read the schema of `namespace` (usually `public`).
///
/// Runs on a private current-thread runtime so callers stay synchronous.
pub fn load_snapshot(url: &str, namespace: &str) -> DoctorResult<SchemaSnapshot> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let (client, connection) = tokio_postgres::connect(url, NoTls).await?;
        let driver = tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::error!(error = %err, "postgres connection failed");
            }
        });

        let snapshot = fetch_snapshot(&client, namespace).await;
        drop(client);
        let _ = driver.await;
        snapshot
    })
}

/// Read the schema of `namespace` through an existing client or transaction.
pub async fn fetch_snapshot<C: GenericClient>(
    client: &C,
    namespace: &str,
) -> DoctorResult<SchemaSnapshot> {
    let mut tables: BTreeMap<String, Table> = BTreeMap::new();

    for row in client.query(TABLES_SQL, &[&namespace]).await? {
        let name: String = row.try_get("table_name")?;
        tables.insert(name.clone(), Table::new(name));
    }

    for row in client.query(COLUMNS_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get("table_name")?;
        if let Some(table) = tables.get_mut(&table_name) {
            table.columns.push(column_from_row(&row)?);
        }
    }

    for row in client.query(PRIMARY_KEYS_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get("table_name")?;
        if let Some(table) = tables.get_mut(&table_name) {
            table.primary_key = row.try_get("columns")?;
        }
    }

    for row in client.query(INDEXES_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get("table_name")?;
        if let Some(table) = tables.get_mut(&table_name) {
            table.indexes.push(index_from_row(&row)?);
        }
    }

    for row in client.query(FOREIGN_KEYS_SQL, &[&namespace]).await? {
        let table_name: String = row.try_get("table_name")?;
        if let Some(table) = tables.get_mut(&table_name) {
            table.foreign_keys.push(ForeignKey {
                name: row.try_get("constraint_name")?,
                columns: row.try_get("columns")?,
                referenced_table: row.try_get("referenced_table")?,
                referenced_columns: row.try_get("referenced_columns")?,
            });
        }
    }

    let mut views = Vec::new();
    for row in client.query(VIEWS_SQL, &[&namespace]).await? {
        views.push(row.try_get::<_, String>("view_name")?);
    }

    tracing::debug!(
        namespace,
        tables = tables.len(),
        views = views.len(),
        "loaded postgres schema"
    );

    Ok(SchemaSnapshot {
        backend: BACKEND.to_string(),
        tables: tables.into_values().collect(),
        views: Some(views),
    })
}

fn column_from_row(row: &Row) -> DoctorResult<Column> {
    Ok(Column {
        name: row.try_get("column_name")?,
        sql_type: row.try_get("data_type")?,
        nullable: row.try_get("nullable")?,
        default: row.try_get("default_expr")?,
    })
}

fn index_from_row(row: &Row) -> DoctorResult<Index> {
    Ok(Index {
        name: row.try_get("index_name")?,
        columns: row.try_get("columns")?,
        unique: row.try_get("is_unique")?,
        predicate: row.try_get("predicate")?,
        expression: row.try_get("has_expression")?,
    })
}
