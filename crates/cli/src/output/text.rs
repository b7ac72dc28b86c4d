use anyhow::Result;
use colored::Colorize;
use schema_doctor::problem::{IoSink, OutputSink};
use schema_doctor::report::SuiteReport;

pub fn print(report: &SuiteReport, quiet: bool, no_color: bool) -> Result<()> {
    // Quiet mode: bare problem lines, one per problem, for piping.
    if quiet {
        let mut sink = IoSink::stdout();
        for detector in &report.reports {
            for problem in &detector.problems {
                sink.write_line(&problem.message)?;
            }
        }
        return Ok(());
    }

    if no_color {
        colored::control::set_override(false);
    }

    println!();
    println!("{}", "  schema-doctor - Schema Health Check".bold());
    println!(
        "  Backend: {}  Tables analyzed: {}",
        report.backend, report.tables_analyzed
    );
    println!();

    for detector in &report.reports {
        if detector.success {
            println!("  {} {}", "✓".green().bold(), detector.detector);
            continue;
        }

        println!(
            "  {} {} ({} problem{})",
            "✗".red().bold(),
            detector.detector.bold(),
            detector.problems.len(),
            if detector.problems.len() == 1 { "" } else { "s" }
        );
        for problem in &detector.problems {
            println!("    {} {}", "-".dimmed(), problem.message);
        }
    }
    println!();

    println!("{}", "  Summary".bold().underline());
    println!("    Detectors run: {}", report.detectors_run);
    println!("    Failed:        {}", report.failed().count());
    println!("    Problems:      {}", report.total_problems);
    let fingerprint = &report.schema_fingerprint;
    println!("    Schema:        {}", fingerprint.get(..12).unwrap_or(fingerprint));
    println!();

    if report.success {
        println!("  {} No issues found.", "✓".green().bold());
        println!();
    }

    Ok(())
}
