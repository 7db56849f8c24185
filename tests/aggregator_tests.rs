use pretty_assertions::assert_eq;
use tx_trace_studio::aggregator::{
    aggregate, build_gas_profile, compute_efficiency, top_gas_consumers, GasBreakdown,
};
use tx_trace_studio::parser::{flatten, TraceNode};
use tx_trace_studio::utils::policy::{BreakdownSplit, GasPolicy};
use tx_trace_studio::utils::TraversalLimits;

const A: &str = "0x000000000000000000000000000000000000000a";
const B: &str = "0x000000000000000000000000000000000000000b";

const TRANSFER: &str = "0xa9059cbb";
const APPROVE: &str = "0x095ea7b3";
const SWAP: &str = "0x38ed1739";

fn calls_for(tree: &TraceNode) -> Vec<tx_trace_studio::parser::CallRecord> {
    flatten(tree, &TraversalLimits::default()).unwrap().calls
}

fn sample_tree() -> TraceNode {
    TraceNode::new(A, B)
        .with_input(format!("{}00ff", SWAP))
        .with_gas(120_000)
        .with_child(TraceNode::new(B, A).with_input(TRANSFER).with_gas(30_000))
        .with_child(TraceNode::new(B, A).with_input(APPROVE).with_gas(30_000))
        .with_child(TraceNode::new(B, A).with_input(TRANSFER).with_gas(20_000))
        .with_child(TraceNode::new(B, A).with_value("5").with_gas(2_300))
}

#[test]
fn test_aggregate_groups_and_ranks() {
    let calls = calls_for(&sample_tree());
    let agg = aggregate(&calls, &GasPolicy::default());

    assert_eq!(agg.total_gas, 202_300);

    let summary: Vec<(&str, u64, u32)> = agg
        .function_analyses
        .iter()
        .map(|f| (f.selector.as_str(), f.total_gas, f.call_count))
        .collect();
    assert_eq!(
        summary,
        vec![(SWAP, 120_000, 1), (TRANSFER, 50_000, 2), (APPROVE, 30_000, 1)]
    );
}

#[test]
fn test_breakdown_sums_to_group_total() {
    let calls = calls_for(&sample_tree());
    let agg = aggregate(&calls, &GasPolicy::default());

    for func in &agg.function_analyses {
        let b = func.breakdown;
        assert_eq!(
            b.storage_operations + b.external_calls + b.memory_operations + b.computation + b.other,
            func.total_gas
        );
    }
}

#[test]
fn test_breakdown_property_over_range() {
    let split = BreakdownSplit::default();
    for total in (0..2_000u64).chain([u64::MAX - 1, u64::MAX]) {
        assert_eq!(GasBreakdown::from_total(total, &split).sum(), total);
    }
}

#[test]
fn test_efficiency_boundaries() {
    assert_eq!(compute_efficiency(50, 100), 50.0);
    assert_eq!(compute_efficiency(u64::MAX, 0), 0.0);
    assert_eq!(compute_efficiency(100, 100), 100.0);
}

#[test]
fn test_gas_profile_hints() {
    let calls = calls_for(&sample_tree());
    let profile = build_gas_profile(&calls, 150_000, 300_000, &GasPolicy::default());

    assert_eq!(profile.efficiency, 50.0);
    assert_eq!(profile.global_hints.len(), 1);
    assert_eq!(profile.global_hints[0].category, "Gas");
    assert_eq!(profile.global_hints[0].estimated_savings, 150_000);

    // Only the swap crosses the 100k gas threshold
    let swap = &profile.function_analyses[0];
    assert_eq!(swap.optimization_hints.len(), 1);
    assert_eq!(swap.optimization_hints[0].category, "Gas Optimization");
    assert_eq!(swap.optimization_hints[0].estimated_savings, 12_000);
}

#[test]
fn test_no_global_hint_when_efficient() {
    let calls = calls_for(&sample_tree());
    let profile = build_gas_profile(&calls, 90_000, 100_000, &GasPolicy::default());
    assert!(profile.global_hints.is_empty());
}

#[test]
fn test_aggregate_is_idempotent() {
    let calls = calls_for(&sample_tree());
    let policy = GasPolicy::default();

    let first = serde_json::to_string(&build_gas_profile(&calls, 1, 2, &policy)).unwrap();
    for _ in 0..5 {
        let again = serde_json::to_string(&build_gas_profile(&calls, 1, 2, &policy)).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_top_consumers_ties_first_seen() {
    let tree = TraceNode::new(A, B)
        .with_input("0x00000001")
        .with_gas(10)
        .with_child(TraceNode::new(B, A).with_input("0x00000002").with_gas(10))
        .with_child(TraceNode::new(B, A).with_input("0x00000003").with_gas(99))
        .with_child(TraceNode::new(B, A).with_input("0x00000004").with_gas(10));

    let calls = calls_for(&tree);
    let agg = aggregate(&calls, &GasPolicy::default());

    let top = top_gas_consumers(&agg.function_analyses, 3);
    let order: Vec<&str> = top.iter().map(|f| f.selector.as_str()).collect();
    assert_eq!(order, vec!["0x00000003", "0x00000001", "0x00000002"]);

    assert!(top_gas_consumers(&agg.function_analyses, 0).is_empty());
    assert_eq!(top_gas_consumers(&agg.function_analyses, 50).len(), 4);
}
