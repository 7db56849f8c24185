//! Gas profile output structures.

use crate::parser::primitives::Selector;
use crate::utils::policy::BreakdownSplit;
use serde::{Deserialize, Serialize};

/// Synthetic split of a function's gas into categories.
///
/// This is a presentation heuristic: the trace carries no opcode-level
/// accounting, so each bucket is a fixed share of the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasBreakdown {
    pub storage_operations: u64,
    pub external_calls: u64,
    pub memory_operations: u64,
    pub computation: u64,
    pub other: u64,
}

impl GasBreakdown {
    /// Split `total` by percentage, flooring each bucket. `other` takes
    /// the remainder so the five fields always sum to `total`.
    ///
    /// Buckets are filled in order and each is capped by what is left, so
    /// a split over 100% cannot allocate more than `total`.
    pub fn from_total(total: u64, split: &BreakdownSplit) -> Self {
        let mut remaining = total;
        let mut take = |percent: u8| {
            let amount = share(total, percent).min(remaining);
            remaining -= amount;
            amount
        };

        let storage_operations = take(split.storage_operations);
        let external_calls = take(split.external_calls);
        let memory_operations = take(split.memory_operations);
        let computation = take(split.computation);

        Self {
            storage_operations,
            external_calls,
            memory_operations,
            computation,
            other: remaining,
        }
    }

    pub fn sum(&self) -> u64 {
        [
            self.storage_operations,
            self.external_calls,
            self.memory_operations,
            self.computation,
            self.other,
        ]
        .into_iter()
        .fold(0, u64::saturating_add)
    }
}

/// floor(total * percent / 100), saturating at u64::MAX
fn share(total: u64, percent: u8) -> u64 {
    u64::try_from(u128::from(total) * u128::from(percent) / 100).unwrap_or(u64::MAX)
}

/// A suggested optimization with a rough savings estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationHint {
    pub category: String,
    pub description: String,
    pub estimated_savings: u64,
    pub recommendation: String,
}

/// Gas usage of every call sharing one selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionGasAnalysis {
    pub selector: Selector,
    pub function_name: String,
    pub total_gas: u64,
    pub call_count: u32,
    pub breakdown: GasBreakdown,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optimization_hints: Vec<OptimizationHint>,
}

/// Output of grouping calls by selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasAggregate {
    /// Ranked by `total_gas`, descending; ties keep first-seen order
    pub function_analyses: Vec<FunctionGasAnalysis>,

    /// Sum of gas over every call, including calls without a selector
    pub total_gas: u64,
}

/// Transaction-level gas profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasProfile {
    pub total_gas: u64,
    pub gas_limit: u64,
    pub gas_used: u64,

    /// gas_used / gas_limit as a percentage, two decimals
    pub efficiency: f64,

    pub function_analyses: Vec<FunctionGasAnalysis>,
    pub global_hints: Vec<OptimizationHint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_default_split() {
        let breakdown = GasBreakdown::from_total(100_000, &BreakdownSplit::default());
        assert_eq!(breakdown.storage_operations, 30_000);
        assert_eq!(breakdown.external_calls, 35_000);
        assert_eq!(breakdown.memory_operations, 15_000);
        assert_eq!(breakdown.computation, 20_000);
        assert_eq!(breakdown.other, 0);
    }

    #[test]
    fn test_breakdown_rounding_lands_in_other() {
        // 7 * 30% = 2.1, 7 * 35% = 2.45, 7 * 15% = 1.05, 7 * 20% = 1.4
        let breakdown = GasBreakdown::from_total(7, &BreakdownSplit::default());
        assert_eq!(breakdown.storage_operations, 2);
        assert_eq!(breakdown.external_calls, 2);
        assert_eq!(breakdown.memory_operations, 1);
        assert_eq!(breakdown.computation, 1);
        assert_eq!(breakdown.other, 1);
    }

    #[test]
    fn test_breakdown_over_allocated_split_is_capped() {
        let split = BreakdownSplit {
            storage_operations: 90,
            ..BreakdownSplit::default()
        };
        let breakdown = GasBreakdown::from_total(1_000, &split);
        assert_eq!(breakdown.storage_operations, 900);
        assert_eq!(breakdown.external_calls, 100);
        assert_eq!(breakdown.memory_operations, 0);
        assert_eq!(breakdown.computation, 0);
        assert_eq!(breakdown.other, 0);
        assert_eq!(breakdown.sum(), 1_000);

        let split = BreakdownSplit {
            storage_operations: u8::MAX,
            external_calls: u8::MAX,
            memory_operations: u8::MAX,
            computation: u8::MAX,
        };
        let breakdown = GasBreakdown::from_total(u64::MAX, &split);
        assert_eq!(breakdown.storage_operations, u64::MAX);
        assert_eq!(breakdown.sum(), u64::MAX);
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        for total in [0, 1, 2, 3, 99, 101, 12_345, 999_999_999, u64::MAX] {
            let breakdown = GasBreakdown::from_total(total, &BreakdownSplit::default());
            assert_eq!(breakdown.sum(), total, "total {}", total);
        }
    }

    #[test]
    fn test_breakdown_partial_split() {
        let split = BreakdownSplit {
            storage_operations: 50,
            external_calls: 0,
            memory_operations: 0,
            computation: 0,
        };
        let breakdown = GasBreakdown::from_total(1_000, &split);
        assert_eq!(breakdown.storage_operations, 500);
        assert_eq!(breakdown.other, 500);
    }
}
