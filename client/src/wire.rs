//! Wire format of the waste-calculation endpoint.

use serde::Deserialize;

use offcut_types::{CalculationResult, InputError};

/// Response record as the server sends it.
///
/// `adjustment` is optional on the wire and defaults to "N/A" during
/// normalization; `is_special_case` defaults to false for older servers
/// that omit it.
#[derive(Debug, Deserialize)]
pub(crate) struct WasteCalculationWire {
    print_type: String,
    print_run: u32,
    waste_amount: u32,
    #[serde(default)]
    adjustment: Option<String>,
    #[serde(default)]
    is_special_case: bool,
}

impl WasteCalculationWire {
    /// Normalize into the domain record, re-validating at the boundary.
    pub(crate) fn into_result(self) -> Result<CalculationResult, InputError> {
        CalculationResult::new(
            self.print_type,
            self.print_run,
            self.waste_amount,
            self.adjustment,
            self.is_special_case,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_round_trips() {
        let wire: WasteCalculationWire = serde_json::from_str(
            r#"{"print_type":"4/4","print_run":2000,"waste_amount":140,
                "adjustment":"Auto","is_special_case":true}"#,
        )
        .expect("parse");
        let result = wire.into_result().expect("valid payload");

        assert_eq!(result.print_type, "4/4");
        assert_eq!(result.print_run, 2000);
        assert_eq!(result.waste_amount, 140);
        assert_eq!(result.adjustment, "Auto");
        assert!(result.is_special_case);
    }

    #[test]
    fn optional_fields_get_defaults() {
        let wire: WasteCalculationWire = serde_json::from_str(
            r#"{"print_type":"2/0","print_run":500,"waste_amount":30}"#,
        )
        .expect("parse");
        let result = wire.into_result().expect("valid payload");

        assert_eq!(result.adjustment, "N/A");
        assert!(!result.is_special_case);
    }

    #[test]
    fn zero_run_payload_is_rejected() {
        let wire: WasteCalculationWire = serde_json::from_str(
            r#"{"print_type":"2/0","print_run":0,"waste_amount":30}"#,
        )
        .expect("parse");
        assert!(wire.into_result().is_err());
    }
}
