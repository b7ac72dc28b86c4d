use std::path::Path;

use anyhow::{bail, Context, Result};
use schema_doctor::config::Config;

pub fn run(path: &Path, force: bool, database_url: Option<&str>) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        );
    }

    let content = render(database_url)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

/// Default config, with `[database] url` filled in when one is given. The
/// result is checked against the built-in detectors before it is written.
fn render(database_url: Option<&str>) -> Result<String> {
    let mut content = Config::default_toml().to_string();
    if let Some(url) = database_url {
        let line = format!("url = {}", toml_string(url));
        content = content.replacen("# url = \"postgres://localhost/app_development\"", &line, 1);
    }

    let registry = schema_doctor_detectors::default_registry()?;
    Config::from_toml(&content)?.validate(&registry)?;
    Ok(content)
}

fn toml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
