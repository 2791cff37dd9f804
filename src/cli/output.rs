//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
/// Plan or post content failed validation; nothing was written.
pub const EXIT_VALIDATION: i32 = 2;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    if e.is_validation() {
        format!("Validation failed: {}", e)
    } else {
        format!("Error: {}", e)
    }
}

/// Process exit code for an error.
pub fn exit_code(e: &ApiError) -> i32 {
    if e.is_validation() {
        EXIT_VALIDATION
    } else {
        EXIT_FAILURE
    }
}
