use anyhow::Result;
use schema_doctor::report::SuiteReport;

pub fn print(report: &SuiteReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
