//! Output formatting for exec command results.

use super::execute::AffectedResult;
use crate::output::Outputable;

impl Outputable for AffectedResult {
    fn to_table(&self) -> String {
        format!("Affected rows: {}", self.affected)
    }
}
