//! Local waste approximation for degraded operation.
//!
//! Used only when the endpoint is unreachable and the configured policy is
//! [`FallbackPolicy::Approximate`](offcut_types::FallbackPolicy); the
//! primary path never consults this module, so tests can exercise the
//! client with the fallback effectively disabled.
//!
//! The rates mirror the server's observable behavior: a 5% base waste
//! rate, bumped for color-heavy print types, scaled down for large runs
//! and up for small ones.

use offcut_types::{CalculationResult, InputError};

const BASE_WASTE_RATE: f64 = 0.05;
/// Four-color duplex wastes the most sheets on make-ready.
const FOUR_FOUR_RATE: f64 = 0.07;
const TWO_TWO_RATE: f64 = 0.06;

const LARGE_RUN_THRESHOLD: u32 = 5000;
const LARGE_RUN_FACTOR: f64 = 0.8;
const SMALL_RUN_THRESHOLD: u32 = 1000;
const SMALL_RUN_FACTOR: f64 = 1.2;

/// Runs above this size count as automatically adjusted.
const AUTO_ADJUSTMENT_THRESHOLD: u32 = 1000;

/// Five-color types on very large runs fall outside standard waste
/// assumptions.
const SPECIAL_CASE_TYPE_MARKER: &str = "5/";

/// Approximate a calculation result without the server.
///
/// # Errors
///
/// Returns `InputError` for an empty print type or out-of-bounds run; the
/// caller is expected to have validated already.
pub fn approximate_waste(
    print_type: &str,
    print_run: u32,
) -> Result<CalculationResult, InputError> {
    let mut rate = BASE_WASTE_RATE;
    if print_type.contains("4/4") {
        rate = FOUR_FOUR_RATE;
    } else if print_type.contains("2/2") {
        rate = TWO_TWO_RATE;
    }

    if print_run > LARGE_RUN_THRESHOLD {
        rate *= LARGE_RUN_FACTOR;
    } else if print_run < SMALL_RUN_THRESHOLD {
        rate *= SMALL_RUN_FACTOR;
    }

    let waste_amount = (f64::from(print_run) * rate).round() as u32;
    let adjustment = if print_run > AUTO_ADJUSTMENT_THRESHOLD {
        "Auto"
    } else {
        "Manual"
    };
    let is_special_case =
        print_run > LARGE_RUN_THRESHOLD && print_type.contains(SPECIAL_CASE_TYPE_MARKER);

    CalculationResult::new(
        print_type,
        print_run,
        waste_amount,
        Some(adjustment.to_string()),
        is_special_case,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rate_applies_to_plain_types() {
        let result = approximate_waste("4/0", 2000).expect("valid input");
        assert_eq!(result.waste_amount, 100); // 2000 * 0.05
    }

    #[test]
    fn color_heavy_types_waste_more() {
        assert_eq!(
            approximate_waste("4/4", 2000).expect("valid").waste_amount,
            140 // 2000 * 0.07
        );
        assert_eq!(
            approximate_waste("2/2", 2000).expect("valid").waste_amount,
            120 // 2000 * 0.06
        );
    }

    #[test]
    fn large_runs_scale_the_rate_down() {
        // 6000 * 0.05 * 0.8 = 240
        assert_eq!(
            approximate_waste("4/0", 6000).expect("valid").waste_amount,
            240
        );
    }

    #[test]
    fn small_runs_scale_the_rate_up() {
        // 500 * 0.05 * 1.2 = 30
        assert_eq!(
            approximate_waste("4/0", 500).expect("valid").waste_amount,
            30
        );
    }

    #[test]
    fn threshold_runs_use_the_base_rate() {
        // Exactly 5000 is not "large", exactly 1000 is not "small".
        assert_eq!(
            approximate_waste("4/0", 5000).expect("valid").waste_amount,
            250
        );
        assert_eq!(
            approximate_waste("4/0", 1000).expect("valid").waste_amount,
            50
        );
    }

    #[test]
    fn adjustment_label_follows_run_size() {
        assert_eq!(approximate_waste("4/0", 1001).expect("valid").adjustment, "Auto");
        assert_eq!(approximate_waste("4/0", 1000).expect("valid").adjustment, "Manual");
    }

    #[test]
    fn special_case_needs_large_run_and_five_color() {
        assert!(approximate_waste("5/5", 6000).expect("valid").is_special_case);
        assert!(approximate_waste("5/0", 5001).expect("valid").is_special_case);
        assert!(!approximate_waste("5/5", 5000).expect("valid").is_special_case);
        assert!(!approximate_waste("4/4", 6000).expect("valid").is_special_case);
    }
}
