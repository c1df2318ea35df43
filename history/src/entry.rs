//! One persisted record of a past calculation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use offcut_types::CalculationResult;

/// A calculation plus the instant it entered the history.
///
/// The persisted slot carries exactly these fields; the transient
/// `adjustment` label is display-only and is not remembered, matching the
/// original slot format. The timestamp is set at insertion and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub print_type: String,
    pub print_run: u32,
    pub waste_amount: u32,
    pub is_special_case: bool,

    /// Insertion instant, ISO-8601 on the wire.
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Stamp a result with the current instant.
    #[must_use]
    pub fn from_result(result: &CalculationResult) -> Self {
        Self {
            print_type: result.print_type.clone(),
            print_run: result.print_run,
            waste_amount: result.waste_amount,
            is_special_case: result.is_special_case,
            timestamp: Utc::now(),
        }
    }

    /// Exact match on the dedup key.
    #[must_use]
    pub fn matches(&self, print_type: &str, print_run: u32) -> bool {
        self.print_type == print_type && self.print_run == print_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes_with_iso8601_timestamp() {
        let result =
            CalculationResult::new("4/4", 2000, 140, None, false).expect("valid input");
        let entry = HistoryEntry::from_result(&result);

        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["print_type"], "4/4");
        assert_eq!(json["print_run"], 2000);
        assert_eq!(json["waste_amount"], 140);
        assert_eq!(json["is_special_case"], false);

        let ts = json["timestamp"].as_str().expect("timestamp string");
        assert!(ts.contains('T'), "expected ISO-8601 instant, got {ts}");
    }

    #[test]
    fn matches_requires_both_fields() {
        let result =
            CalculationResult::new("4/4", 2000, 140, None, false).expect("valid input");
        let entry = HistoryEntry::from_result(&result);

        assert!(entry.matches("4/4", 2000));
        assert!(!entry.matches("4/4", 2001));
        assert!(!entry.matches("4/0", 2000));
    }
}
