//! Group flattened calls by selector and build the gas profile.
//!
//! Grouping preserves first-seen order before ranking, so the output is
//! a pure function of the call sequence.

use super::metrics::rank_by_gas;
use super::schema::{FunctionGasAnalysis, GasAggregate, GasBreakdown, GasProfile, OptimizationHint};
use crate::parser::primitives::Selector;
use crate::parser::schema::CallRecord;
use crate::utils::policy::GasPolicy;
use log::debug;
use std::collections::HashMap;

/// Running totals for one selector
struct SelectorGroup {
    selector: Selector,
    function_name: String,
    total_gas: u64,
    call_count: u32,
}

/// Group calls by selector and sum their gas
///
/// **Public** - main entry point for aggregation
///
/// Calls carrying the empty selector count toward `total_gas` but are
/// not grouped.
pub fn aggregate(calls: &[CallRecord], policy: &GasPolicy) -> GasAggregate {
    let mut index: HashMap<&Selector, usize> = HashMap::new();
    let mut groups: Vec<SelectorGroup> = Vec::new();
    let mut total_gas: u64 = 0;

    for call in calls {
        total_gas = total_gas.saturating_add(call.gas_used);

        if call.selector.is_empty() {
            continue;
        }

        let slot = *index.entry(&call.selector).or_insert_with(|| {
            groups.push(SelectorGroup {
                selector: call.selector.clone(),
                function_name: call.function_name.clone(),
                total_gas: 0,
                call_count: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.total_gas = group.total_gas.saturating_add(call.gas_used);
        group.call_count = group.call_count.saturating_add(1);
        group.function_name.clone_from(&call.function_name);
    }

    let mut function_analyses: Vec<FunctionGasAnalysis> = groups
        .into_iter()
        .map(|group| finalize_group(group, policy))
        .collect();

    rank_by_gas(&mut function_analyses);

    debug!(
        "Aggregated {} calls into {} functions ({} gas)",
        calls.len(),
        function_analyses.len(),
        total_gas
    );

    GasAggregate {
        function_analyses,
        total_gas,
    }
}

/// Attach breakdown and hints once the total is final
///
/// **Private** - internal conversion
fn finalize_group(group: SelectorGroup, policy: &GasPolicy) -> FunctionGasAnalysis {
    let breakdown = GasBreakdown::from_total(group.total_gas, &policy.breakdown);

    let optimization_hints = if policy.function_hints {
        function_hints(&group.selector, group.total_gas, group.call_count, policy)
    } else {
        Vec::new()
    };

    FunctionGasAnalysis {
        selector: group.selector,
        function_name: group.function_name,
        total_gas: group.total_gas,
        call_count: group.call_count,
        breakdown,
        optimization_hints,
    }
}

/// Per-function hints from call-count and gas thresholds
pub fn function_hints(
    selector: &Selector,
    total_gas: u64,
    call_count: u32,
    policy: &GasPolicy,
) -> Vec<OptimizationHint> {
    let mut hints = Vec::new();

    if call_count > policy.call_count_hint_threshold {
        hints.push(OptimizationHint {
            category: "External Calls".to_string(),
            description: format!("{} is called {} times in this transaction", selector, call_count),
            estimated_savings: u64::from(call_count).saturating_mul(policy.savings_per_call),
            recommendation: "Batch repeated calls or cache their results".to_string(),
        });
    }

    if total_gas > policy.gas_hint_threshold {
        hints.push(OptimizationHint {
            category: "Gas Optimization".to_string(),
            description: format!("{} consumed {} gas", selector, total_gas),
            estimated_savings: total_gas / policy.gas_hint_divisor.max(1),
            recommendation: "Review storage access and loops in this function".to_string(),
        });
    }

    hints
}

/// Percentage of the gas limit actually used, rounded to 2 decimals
///
/// Returns exactly 0 when `gas_limit` is 0.
pub fn compute_efficiency(gas_used: u64, gas_limit: u64) -> f64 {
    if gas_limit == 0 {
        return 0.0;
    }
    round2(gas_used as f64 * 100.0 / gas_limit as f64)
}

/// Round half away from zero to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Transaction-level hints
pub fn global_hints(
    efficiency: f64,
    gas_used: u64,
    gas_limit: u64,
    policy: &GasPolicy,
) -> Vec<OptimizationHint> {
    if efficiency < policy.efficiency_hint_threshold && gas_limit > gas_used {
        vec![OptimizationHint {
            category: "Gas".to_string(),
            description: format!(
                "Transaction used {:.2}% of its gas limit ({} of {})",
                efficiency, gas_used, gas_limit
            ),
            estimated_savings: gas_limit - gas_used,
            recommendation: "Set the gas limit closer to the expected usage".to_string(),
        }]
    } else {
        Vec::new()
    }
}

/// Build the complete gas profile for a transaction
///
/// **Public** - used by the analyzer pipeline
///
/// # Arguments
/// * `calls` - Flattened calls
/// * `gas_used` - Receipt gas used
/// * `gas_limit` - Transaction gas limit
/// * `policy` - Hint thresholds and breakdown split
pub fn build_gas_profile(
    calls: &[CallRecord],
    gas_used: u64,
    gas_limit: u64,
    policy: &GasPolicy,
) -> GasProfile {
    let GasAggregate {
        function_analyses,
        total_gas,
    } = aggregate(calls, policy);

    let efficiency = compute_efficiency(gas_used, gas_limit);

    GasProfile {
        total_gas,
        gas_limit,
        gas_used,
        efficiency,
        function_analyses,
        global_hints: global_hints(efficiency, gas_used, gas_limit, policy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::primitives::{Address, CallType};

    fn call(input: &str, gas: u64) -> CallRecord {
        let selector = Selector::from_input(input);
        CallRecord {
            from: Address::new("0xa"),
            to: Address::new("0xb"),
            value: "0".to_string(),
            data: input.to_string(),
            function_name: selector.to_string(),
            selector,
            call_type: CallType::Call,
            gas_used: gas,
            success: true,
            depth: 0,
            error: None,
        }
    }

    #[test]
    fn test_efficiency() {
        assert_eq!(compute_efficiency(50, 100), 50.0);
        assert_eq!(compute_efficiency(1, 3), 33.33);
        assert_eq!(compute_efficiency(2, 3), 66.67);
        assert_eq!(compute_efficiency(12345, 0), 0.0);
        assert_eq!(compute_efficiency(0, 0), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(12.346), 12.35);
    }

    #[test]
    fn test_empty_selector_excluded_but_counted() {
        let calls = vec![call("0x", 21_000), call("0xa9059cbb00", 5_000)];
        let agg = aggregate(&calls, &GasPolicy::default());

        assert_eq!(agg.total_gas, 26_000);
        assert_eq!(agg.function_analyses.len(), 1);
        assert_eq!(agg.function_analyses[0].total_gas, 5_000);
    }

    #[test]
    fn test_grouping_sums() {
        let calls = vec![
            call("0x11111111", 100),
            call("0x22222222", 300),
            call("0x11111111", 250),
        ];
        let agg = aggregate(&calls, &GasPolicy::default());

        assert_eq!(agg.function_analyses.len(), 2);
        assert_eq!(agg.function_analyses[0].selector.as_str(), "0x11111111");
        assert_eq!(agg.function_analyses[0].total_gas, 350);
        assert_eq!(agg.function_analyses[0].call_count, 2);
        assert_eq!(agg.function_analyses[1].total_gas, 300);
    }

    #[test]
    fn test_global_hint_fires_below_threshold() {
        let hints = global_hints(50.0, 50, 100, &GasPolicy::default());
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].category, "Gas");
        assert_eq!(hints[0].estimated_savings, 50);
    }

    #[test]
    fn test_global_hint_quiet_when_efficient() {
        assert!(global_hints(90.0, 90, 100, &GasPolicy::default()).is_empty());
        // Limit of zero: efficiency 0, but nothing to save
        assert!(global_hints(0.0, 10, 0, &GasPolicy::default()).is_empty());
    }

    #[test]
    fn test_function_hints_thresholds() {
        let policy = GasPolicy::default();
        let selector = Selector::from("0xa9059cbb");

        assert!(function_hints(&selector, 100_000, 5, &policy).is_empty());

        let hints = function_hints(&selector, 100_001, 6, &policy);
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].category, "External Calls");
        assert_eq!(hints[0].estimated_savings, 6_000);
        assert_eq!(hints[1].category, "Gas Optimization");
        assert_eq!(hints[1].estimated_savings, 10_000);
    }

    #[test]
    fn test_function_hints_disabled() {
        let policy = GasPolicy {
            function_hints: false,
            ..Default::default()
        };
        let calls: Vec<CallRecord> = (0..10).map(|_| call("0x11111111", 50_000)).collect();
        let agg = aggregate(&calls, &policy);
        assert!(agg.function_analyses[0].optimization_hints.is_empty());
    }
}
