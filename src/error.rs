use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the reporting core.
///
/// `ResourceNotFound` and `Parse` mean no view can be produced at all. The
/// remaining variants are scoped to a single view and are rendered as a
/// warning in place of that view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Report file not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    #[error("Failed to parse workbook: {0}")]
    Parse(String),

    #[error("{0}")]
    Schema(String),

    #[error("Game not found: {label}")]
    Selection { label: String },

    #[error("Sheet not found: {name}")]
    NotFound { name: String },
}

impl DashboardError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DashboardError::Schema(_)
                | DashboardError::Selection { .. }
                | DashboardError::NotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
