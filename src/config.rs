use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REPORT_PATH: &str = "./WFU_SoccerTeam_Report.xlsx";

/// Runtime settings, read from the environment (after `.env` files have
/// been applied by the binary).
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub report_path: PathBuf,
    /// Zero-based physical row holding the headers.
    pub header_row: u32,
    pub export_dir: PathBuf,
    pub tick_rate: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            header_row: crate::loader::DEFAULT_HEADER_ROW,
            export_dir: PathBuf::from("."),
            tick_rate: Duration::from_millis(250),
            log_file: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DashboardConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        // The variable is 1-based like the row numbers shown in a spreadsheet.
        let header_row = non_empty("COACH_HEADER_ROW")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .map(|row| row.max(1) - 1)
            .unwrap_or(defaults.header_row);
        let tick_ms = non_empty("COACH_TICK_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(250)
            .max(50);

        Self {
            report_path: non_empty("COACH_REPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.report_path),
            header_row,
            export_dir: non_empty("COACH_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            tick_rate: Duration::from_millis(tick_ms),
            log_file: non_empty("COACH_LOG_FILE").map(PathBuf::from),
        }
    }
}
