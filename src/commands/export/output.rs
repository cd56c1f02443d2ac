//! Output formatting for export command results.

use super::execute::ExportResult;
use crate::output::Outputable;

impl Outputable for ExportResult {
    fn to_table(&self) -> String {
        format!(
            "Exported {} row{} to worksheet '{}': {}",
            self.rows,
            if self.rows == 1 { "" } else { "s" },
            self.sheet,
            self.path.display()
        )
    }
}
