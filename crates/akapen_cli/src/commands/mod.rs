//! Command implementations

mod lint;

pub use lint::run_lint;
