//! Ranking and distribution statistics over function gas analyses.
//!
//! The heaviest functions are the primary targets for optimization.

use super::schema::FunctionGasAnalysis;
use log::debug;

/// Sort by total gas, descending, in place
///
/// `sort_by` is stable: equal totals keep their first-seen order.
pub fn rank_by_gas(analyses: &mut [FunctionGasAnalysis]) {
    analyses.sort_by(|a, b| b.total_gas.cmp(&a.total_gas));
}

/// Top gas consumers
///
/// **Public** - main entry point for ranking
///
/// # Arguments
/// * `analyses` - Function analyses in any order
/// * `top_n` - Number of entries to return (e.g., 10)
///
/// # Returns
/// At most `top_n` analyses, heaviest first. Empty when `top_n` is 0.
pub fn top_gas_consumers(analyses: &[FunctionGasAnalysis], top_n: usize) -> Vec<FunctionGasAnalysis> {
    debug!(
        "Selecting top {} gas consumers from {} functions",
        top_n,
        analyses.len()
    );

    if top_n == 0 || analyses.is_empty() {
        return Vec::new();
    }

    let mut ranked = analyses.to_vec();
    rank_by_gas(&mut ranked);
    ranked.truncate(top_n);
    ranked
}

/// Share of `part` in `total` as a percentage (0 when total is 0)
pub fn percentage_of(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Calculate gas distribution statistics
///
/// **Public** - provides summary statistics
pub fn calculate_gas_distribution(analyses: &[FunctionGasAnalysis]) -> GasDistribution {
    if analyses.is_empty() {
        return GasDistribution::default();
    }

    let total = analyses
        .iter()
        .map(|a| a.total_gas)
        .fold(0, u64::saturating_add);
    let count = analyses.len();
    let mean = total / count as u64;

    let mut weights: Vec<u64> = analyses.iter().map(|a| a.total_gas).collect();
    weights.sort_unstable();
    let median = weights[weights.len() / 2];

    let top_function_gas = weights.last().copied().unwrap_or(0);

    GasDistribution {
        total_gas: total,
        function_count: count,
        mean_gas_per_function: mean,
        median_gas_per_function: median,
        top_function_gas,
        top_function_percentage: percentage_of(top_function_gas, total),
    }
}

/// Gas distribution statistics
///
/// **Public** - returned from calculate_gas_distribution
#[derive(Debug, Clone, Default)]
pub struct GasDistribution {
    /// Total gas across all functions
    pub total_gas: u64,

    /// Number of distinct selectors
    pub function_count: usize,

    pub mean_gas_per_function: u64,

    pub median_gas_per_function: u64,

    /// Gas consumed by the single heaviest function
    pub top_function_gas: u64,

    /// Percentage of total gas in the heaviest function
    pub top_function_percentage: f64,
}

impl GasDistribution {
    /// Check if one function dominates gas usage
    ///
    /// Returns true if the heaviest function consumes >80% of gas
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_function_percentage > 80.0
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Total: {} gas | Functions: {} | Mean: {} | Median: {} | Top: {:.1}%",
            self.total_gas,
            self.function_count,
            self.mean_gas_per_function,
            self.median_gas_per_function,
            self.top_function_percentage
        )
    }
}
