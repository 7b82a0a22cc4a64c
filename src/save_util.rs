use crate::error::Result;
use crate::google_search::{DorkReport, RunOutcome};
use std::fs;
use std::path::{Path, PathBuf};

pub const DORK_OUTPUT_DIR: &str = "dork_results";
pub const DORK_OUTPUT_FILE: &str = "google_dork.csv";
pub const HEADERS: [&str; 3] = ["Domain", "Hosts", "Emails"];

/// writes `<output_dir>/dork_results/google_dork.csv`, truncating it
pub fn save_reports(output_dir: &Path, reports: &[DorkReport]) -> Result<PathBuf> {
    let dir = output_dir.join(DORK_OUTPUT_DIR);
    fs::create_dir_all(&dir)?;

    let path = dir.join(DORK_OUTPUT_FILE);
    let mut wtr = csv::Writer::from_path(&path)?;
    wtr.write_record(HEADERS)?;
    for report in reports {
        wtr.write_record([
            report.domain.as_str(),
            report.hosts.join("\n").as_str(),
            report.emails.join("\n").as_str(),
        ])?;
    }
    wtr.flush()?;

    Ok(path)
}

/// reports instead of failing, the results are already on screen
pub fn save_or_report(output_dir: &Path, reports: &[DorkReport]) {
    info!(format!(
        "Saving google dork results in {}",
        output_dir.join(DORK_OUTPUT_DIR).display()
    ));
    match save_reports(output_dir, reports) {
        Ok(path) => info!(format!("CSV file '{}' created successfully.", path.display())),
        Err(e) => err!(format!("An error occured when writing google dork output: {e}")),
    }
}

/// prints a report, nothing is printed when nothing was found
pub fn print_report(number: usize, report: &DorkReport) {
    if let RunOutcome::HardBlocked { after } = report.outcome {
        warn!(format!(
            "{}: stopped after {after} dorks, google appears to block automated access",
            report.domain
        ));
    }
    if report.is_empty() {
        return;
    }

    println!("\nGoogle Dork Results:");
    success!(format!("{number}. {}", report.domain));
    if !report.hosts.is_empty() {
        println!("  Hosts:");
        for host in &report.hosts {
            println!("    {host}");
        }
    }
    if !report.emails.is_empty() {
        println!("  Emails:");
        for email in &report.emails {
            println!("    {email}");
        }
    }
}
