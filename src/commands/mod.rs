//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod capture;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, run_pipeline, validate_analyze_args, GasFigures};
pub use capture::{execute_capture, validate_args};
pub use models::{AnalyzeArgs, CaptureArgs};
pub use utils::{display_policy, display_version, validate_result_file, validate_tx_hash};
