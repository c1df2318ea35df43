//! Naive "increase the run size" optimization suggestion.
//!
//! Small runs carry a disproportionate per-unit waste share. The heuristic
//! proposes the next 500-multiple above the current run and estimates the
//! relative reduction, assuming total waste grows by 20% at the larger run.
//! Absolute waste may rise; the claim is only about waste per unit.

use crate::CalculationResult;
use crate::severity::waste_percentage;

/// Runs at or above this size get no suggestion.
const SUGGESTION_RUN_CUTOFF: u32 = 2000;

/// Suggested runs are rounded up to multiples of this step.
const RUN_STEP: u32 = 500;

/// Assumed growth of total waste at the suggested run.
const WASTE_GROWTH_FACTOR: f64 = 1.2;

/// A run-size suggestion worth showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSuggestion {
    /// Proposed run size, always strictly greater than the current run.
    pub suggested_run: u32,

    /// Estimated reduction of relative waste, in whole percentage points.
    pub reduction_pct: u32,
}

/// Compute a suggestion for the given result, if one applies.
///
/// Returns `None` for runs of 2000 or more, and for suggestions that would
/// not reduce the relative waste.
#[must_use]
pub fn suggest_larger_run(result: &CalculationResult) -> Option<RunSuggestion> {
    if result.print_run >= SUGGESTION_RUN_CUTOFF {
        return None;
    }

    let mut suggested_run = result.print_run.div_ceil(RUN_STEP) * RUN_STEP;
    if suggested_run <= result.print_run {
        suggested_run += RUN_STEP;
    }

    let current_pct = waste_percentage(result.waste_amount, result.print_run);
    let estimated_new_waste = f64::from(result.waste_amount) * WASTE_GROWTH_FACTOR;
    let new_pct = estimated_new_waste / f64::from(suggested_run) * 100.0;
    let reduction = (current_pct - new_pct).round();

    if reduction > 0.0 {
        Some(RunSuggestion {
            suggested_run,
            reduction_pct: reduction as u32,
        })
    } else {
        None
    }
}
