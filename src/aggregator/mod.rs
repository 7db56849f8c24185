//! Aggregation of flattened calls into a gas profile.
//!
//! This module transforms flattened calls into:
//! - Per-selector gas totals with a synthetic category breakdown
//! - Efficiency and optimization hints
//! - Rankings (top gas consumers) and distribution statistics

pub mod gas_profile;
pub mod metrics;
pub mod schema;

// Re-export main types and functions
pub use gas_profile::{aggregate, build_gas_profile, compute_efficiency, round2};
pub use metrics::{calculate_gas_distribution, top_gas_consumers, GasDistribution};
pub use schema::{FunctionGasAnalysis, GasAggregate, GasBreakdown, GasProfile, OptimizationHint};
