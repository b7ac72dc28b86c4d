use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use schema_doctor::config::Config;
use schema_doctor::model::ModelSet;
use schema_doctor::report::SuiteReport;
use schema_doctor::schema::{postgres, SchemaSnapshot};

use crate::output;
use crate::OutputFormat;

pub struct CheckArgs {
    pub snapshot: Option<PathBuf>,
    pub database_url: Option<String>,
    pub schema: Option<String>,
    pub models: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub detectors: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub format: Option<OutputFormat>,
    pub quiet: bool,
    pub no_color: bool,
}

/// Returns `true` when every selected detector passed.
pub fn run(args: CheckArgs) -> Result<bool> {
    // 1. Config and detector registry
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(".schema-doctor.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;

    let registry = schema_doctor_detectors::default_registry()?;
    config.validate(&registry)?;

    // 2. Select detectors
    let mut names = registry.list_detectors();
    if let Some(ref only) = args.detectors {
        if let Some(unknown) = only.iter().find(|n| registry.get(n).is_none()) {
            bail!("unknown detector `{unknown}` (see `schema-doctor list`)");
        }
        names.retain(|name| only.iter().any(|n| n == name));
    }
    if let Some(ref excluded) = args.exclude {
        names.retain(|name| !excluded.iter().any(|n| n == name));
    }

    // 3. Fetch the schema once; every detector sees the same snapshot
    let snapshot = load_schema(&args, &config)?;
    let models = match &args.models {
        Some(path) => ModelSet::load(path)
            .with_context(|| format!("Failed to load models: {}", path.display()))?,
        None => ModelSet::default(),
    };

    if !args.quiet {
        eprintln!(
            "Checking {} tables with {} detectors...",
            snapshot.tables.len(),
            names.len()
        );
    }

    // 4. Run and aggregate; detectors that error are reported after the rest
    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for outcome in registry.run_selected(&names, &snapshot, models.as_slice(), &config)? {
        match outcome {
            Ok(report) => reports.push(report),
            Err(err) => failures.push(err),
        }
    }
    let report = SuiteReport::from_reports(&snapshot, reports);

    // 5. Output
    let format = match args.format {
        Some(format) => format,
        None => parse_format(&config.global.output_format)?,
    };
    match format {
        OutputFormat::Json => output::json::print(&report)?,
        OutputFormat::Text => output::text::print(&report, args.quiet, args.no_color)?,
    }

    if !failures.is_empty() {
        for err in &failures {
            eprintln!("error: {err}");
        }
        bail!("{} of {} detectors could not run", failures.len(), names.len());
    }

    Ok(report.success)
}

fn load_schema(args: &CheckArgs, config: &Config) -> Result<SchemaSnapshot> {
    if let Some(path) = &args.snapshot {
        return SchemaSnapshot::load(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()));
    }

    let Some(url) = args.database_url.as_ref().or(config.database.url.as_ref()) else {
        bail!("no schema source: pass --snapshot or --database-url");
    };
    let namespace = args.schema.as_deref().unwrap_or(&config.database.schema);
    tracing::info!(namespace, "introspecting database");
    postgres::load_snapshot(url, namespace).context("Failed to introspect database")
}

fn parse_format(name: &str) -> Result<OutputFormat> {
    match name.to_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => bail!("unknown output format `{other}` in config"),
    }
}
