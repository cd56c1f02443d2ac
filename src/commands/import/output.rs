//! Output formatting for import command results.

use super::execute::ImportResult;
use crate::output::Outputable;

impl Outputable for ImportResult {
    fn to_table(&self) -> String {
        let mut output = String::new();
        output.push_str("Import Summary:\n");
        output.push_str(&format!("  Worksheet: {}\n", self.path.display()));
        output.push_str(&format!("  Table: {}\n", self.table));
        output.push_str(&format!("  Rows inserted: {}\n", self.inserted));
        output
    }
}
