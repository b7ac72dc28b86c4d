use anyhow::Result;

pub fn run() -> Result<()> {
    let detectors = schema_doctor_detectors::all_detectors();

    println!("{:<30} Description", "Name");
    println!("{}", "-".repeat(90));

    for d in &detectors {
        println!("{:<30} {}", d.name(), d.description());
        for setting in d.settings() {
            let default = setting
                .default
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{:<30}   {} = {}", "", setting.key, default);
        }
    }

    println!("\nTotal: {} detectors", detectors.len());
    Ok(())
}
