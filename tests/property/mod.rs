//! Property-based tests for rotation and scheduling invariants

mod rotation;
mod scheduling;
