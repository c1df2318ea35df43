//! The normalized record produced by one waste calculation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the requested run size. The input form clamps to this
/// value, so anything above it is a programming error, not a user typo.
pub const MAX_PRINT_RUN: u32 = 1_000_000;

/// Label used when the server omits the adjustment field.
const ADJUSTMENT_NONE: &str = "N/A";

/// Validation failures caught before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("print type must not be empty")]
    EmptyPrintType,
    #[error("print run must be a positive integer")]
    NonPositiveRun,
    #[error("print run {0} exceeds the maximum of {MAX_PRINT_RUN}")]
    RunTooLarge(u32),
}

/// Validate a requested run size.
///
/// # Errors
///
/// Returns `InputError` for zero or out-of-bound runs.
pub fn validate_print_run(print_run: u32) -> Result<(), InputError> {
    if print_run == 0 {
        return Err(InputError::NonPositiveRun);
    }
    if print_run > MAX_PRINT_RUN {
        return Err(InputError::RunTooLarge(print_run));
    }
    Ok(())
}

/// One waste calculation, as rendered and as remembered.
///
/// Immutable once constructed - the history cache stores copies, never
/// live references back into whatever produced the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Ink/color configuration identifier (e.g. "4/4", "2/0").
    pub print_type: String,

    /// Requested quantity, always positive.
    pub print_run: u32,

    /// Computed waste in sheets.
    pub waste_amount: u32,

    /// Free-form adjustment label ("Auto"/"Manual"/"N/A").
    pub adjustment: String,

    /// Business-rule exception flag (e.g. large run + certain print types).
    pub is_special_case: bool,
}

impl CalculationResult {
    /// Construct a validated result record.
    ///
    /// An absent adjustment becomes `"N/A"`, matching the wire contract.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if `print_type` is empty or `print_run` is out
    /// of bounds.
    pub fn new(
        print_type: impl Into<String>,
        print_run: u32,
        waste_amount: u32,
        adjustment: Option<String>,
        is_special_case: bool,
    ) -> Result<Self, InputError> {
        let print_type = print_type.into();
        if print_type.trim().is_empty() {
            return Err(InputError::EmptyPrintType);
        }
        validate_print_run(print_run)?;

        Ok(Self {
            print_type,
            print_run,
            waste_amount,
            adjustment: adjustment.unwrap_or_else(|| ADJUSTMENT_NONE.to_string()),
            is_special_case,
        })
    }
}
