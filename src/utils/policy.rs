//! Analysis policy: every tunable threshold in one place.
//!
//! Defaults mirror the built-in heuristics. A policy can be loaded from
//! TOML; any section or field left out keeps its default.
//!
//! ```toml
//! [gas]
//! efficiency_hint_threshold = 75.0
//!
//! [gas.breakdown]
//! storage_operations = 40
//!
//! [scanner]
//! extended_rules = true
//!
//! [limits]
//! max_depth = 256
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::config::{DEFAULT_MAX_CALLS, DEFAULT_MAX_DEPTH};
use super::error::PolicyError;

/// Complete analysis policy
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalysisPolicy {
    #[serde(default)]
    pub gas: GasPolicy,

    #[serde(default)]
    pub scanner: ScannerPolicy,

    #[serde(default)]
    pub limits: TraversalLimits,
}

/// Gas aggregation and hint thresholds
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GasPolicy {
    /// Global hint fires when efficiency (percent) is below this
    pub efficiency_hint_threshold: f64,

    /// Per-function "External Calls" hint fires when call count exceeds this
    pub call_count_hint_threshold: u32,

    /// Estimated savings credited per call in the "External Calls" hint
    pub savings_per_call: u64,

    /// Per-function "Gas Optimization" hint fires when total gas exceeds this
    pub gas_hint_threshold: u64,

    /// Savings estimate for the "Gas Optimization" hint is `total_gas / divisor`
    pub gas_hint_divisor: u64,

    /// Generate per-function hints at all
    pub function_hints: bool,

    /// Synthetic category split
    pub breakdown: BreakdownSplit,
}

impl Default for GasPolicy {
    fn default() -> Self {
        Self {
            efficiency_hint_threshold: 80.0,
            call_count_hint_threshold: 5,
            savings_per_call: 1_000,
            gas_hint_threshold: 100_000,
            gas_hint_divisor: 10,
            function_hints: true,
            breakdown: BreakdownSplit::default(),
        }
    }
}

/// Percentages (of a group's total gas) assigned to each breakdown bucket.
/// Whatever the four leave over lands in `other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakdownSplit {
    pub storage_operations: u8,
    pub external_calls: u8,
    pub memory_operations: u8,
    pub computation: u8,
}

impl Default for BreakdownSplit {
    fn default() -> Self {
        Self {
            storage_operations: 30,
            external_calls: 35,
            memory_operations: 15,
            computation: 20,
        }
    }
}

impl BreakdownSplit {
    /// Sum of the four explicit percentages
    pub fn allocated(&self) -> u32 {
        u32::from(self.storage_operations)
            + u32::from(self.external_calls)
            + u32::from(self.memory_operations)
            + u32::from(self.computation)
    }
}

/// Which heuristics the scanner runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerPolicy {
    /// Also run the unchecked-call and delegatecall rules
    pub extended_rules: bool,
}

/// Resource guards for call-tree traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TraversalLimits {
    pub max_depth: u32,
    pub max_calls: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_calls: DEFAULT_MAX_CALLS,
        }
    }
}

impl AnalysisPolicy {
    /// Reject policies the aggregator cannot honour
    pub fn validate(&self) -> Result<(), PolicyError> {
        let allocated = self.gas.breakdown.allocated();
        if allocated > 100 {
            return Err(PolicyError::Invalid(format!(
                "breakdown percentages sum to {}%, must not exceed 100%",
                allocated
            )));
        }

        if self.gas.gas_hint_divisor == 0 {
            return Err(PolicyError::Invalid(
                "gas_hint_divisor must be greater than 0".to_string(),
            ));
        }

        if !self.gas.efficiency_hint_threshold.is_finite() {
            return Err(PolicyError::Invalid(
                "efficiency_hint_threshold must be a finite number".to_string(),
            ));
        }

        if self.limits.max_calls == 0 {
            return Err(PolicyError::Invalid(
                "limits.max_calls must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load a policy from a TOML file
///
/// # Errors
/// * `PolicyError::IoError` - If file cannot be read
/// * `PolicyError::ParseFailed` - If TOML is invalid
/// * `PolicyError::Invalid` - If values are out of range
pub fn load_policy(path: impl AsRef<Path>) -> Result<AnalysisPolicy, PolicyError> {
    let contents = fs::read_to_string(path)?;
    parse_policy(&contents)
}

/// Parse a policy from TOML text
pub fn parse_policy(contents: &str) -> Result<AnalysisPolicy, PolicyError> {
    let policy: AnalysisPolicy = toml::from_str(contents)?;
    policy.validate()?;
    Ok(policy)
}
