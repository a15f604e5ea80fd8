use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::table::Table;

/// The three sheets the dashboard knows how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SheetRole {
    CoachView,
    TargetsNotes,
    MatchSummary,
}

impl SheetRole {
    pub const ALL: [SheetRole; 3] = [
        SheetRole::CoachView,
        SheetRole::TargetsNotes,
        SheetRole::MatchSummary,
    ];

    pub fn sheet_name(self) -> &'static str {
        match self {
            SheetRole::CoachView => "Dashboard (Coach View)",
            SheetRole::TargetsNotes => "Targets & Notes",
            SheetRole::MatchSummary => "Match Summary (Analyst Data)",
        }
    }

    /// Warning shown in place of a view whose sheet is missing.
    pub fn missing_warning(self) -> String {
        match self {
            SheetRole::MatchSummary => "Match Summary sheet not found".to_string(),
            other => format!("{} sheet not found", other.sheet_name()),
        }
    }
}

/// Every table of the loaded workbook, in workbook order.
///
/// Built once by the loader and only ever handed out by shared reference.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableRegistry {
    tables: Vec<Table>,
}

impl TableRegistry {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn by_role(&self, role: SheetRole) -> Option<&Table> {
        self.find(role.sheet_name())
    }

    pub fn by_name(&self, name: &str) -> Result<&Table> {
        self.find(name).ok_or_else(|| DashboardError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.tables.iter().map(Table::name).collect()
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Roles whose sheet is absent from the workbook.
    pub fn missing_roles(&self) -> Vec<SheetRole> {
        SheetRole::ALL
            .into_iter()
            .filter(|role| self.by_role(*role).is_none())
            .collect()
    }

    fn find(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TableRegistry {
        TableRegistry::new(vec![
            Table::new("Targets & Notes", vec!["Note".into()], Vec::new()),
            Table::new("Extra", Vec::new(), Vec::new()),
        ])
    }

    #[test]
    fn role_lookup_reports_absence_without_error() {
        let reg = registry();
        assert!(reg.by_role(SheetRole::TargetsNotes).is_some());
        assert!(reg.by_role(SheetRole::CoachView).is_none());
        assert_eq!(
            reg.missing_roles(),
            vec![SheetRole::CoachView, SheetRole::MatchSummary]
        );
    }

    #[test]
    fn name_lookup_fails_for_unknown_sheet() {
        let reg = registry();
        assert_eq!(reg.sheet_names(), vec!["Targets & Notes", "Extra"]);
        let err = reg.by_name("Nope").unwrap_err();
        assert_eq!(
            err,
            DashboardError::NotFound {
                name: "Nope".to_string()
            }
        );
        assert!(err.is_recoverable());
    }
}
