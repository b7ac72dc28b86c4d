use std::path::Path;

use anyhow::{Context, Result};
use schema_doctor::schema::postgres;

pub fn run(database_url: &str, schema: &str, output: Option<&Path>) -> Result<()> {
    let snapshot =
        postgres::load_snapshot(database_url, schema).context("Failed to introspect database")?;

    match output {
        Some(path) => {
            snapshot.save(path)?;
            eprintln!(
                "Wrote {} tables to {} (fingerprint {})",
                snapshot.tables.len(),
                path.display(),
                snapshot.fingerprint()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }
    Ok(())
}
