//! Output formatting for seed command results.

use super::execute::SeedResult;
use crate::bridge::json::serialize;
use crate::output::Outputable;

impl Outputable for SeedResult {
    fn to_table(&self) -> String {
        let mut output = String::new();
        output.push_str(if self.inserted {
            "Inserted sample user."
        } else {
            "User table already populated."
        });
        if self.records.is_empty() {
            output.push_str("\nSample user not found.");
        }
        for record in &self.records {
            output.push('\n');
            output.push_str(&serialize(record));
        }
        output
    }
}
