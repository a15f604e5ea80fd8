use std::path::PathBuf;

use anyhow::Result;

use wfu_coach_dashboard::config::DashboardConfig;
use wfu_coach_dashboard::sample;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| DashboardConfig::from_env().report_path);

    sample::write_sample_report(&path)?;

    println!("Sample report written");
    println!("File: {}", path.display());
    for table in sample::sample_registry().tables() {
        println!(" - {} ({} rows)", table.name(), table.row_count());
    }
    Ok(())
}
