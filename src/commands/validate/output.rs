//! Output formatting for validate command results.

use super::execute::ValidateResult;
use crate::output::Outputable;

impl Outputable for ValidateResult {
    fn to_table(&self) -> String {
        let verdict = if self.result.valid { "Valid" } else { "Invalid" };
        format!("{}: {}", verdict, self.result.message)
    }
}
