//! Flatten a call tree into call-stack entry order.
//!
//! Walks depth-first, pre-order: a frame is recorded before any of its
//! children, children in the order they were executed. Uses an explicit
//! work stack so a hostile trace cannot exhaust the native stack.

use super::call_trace::TraceNode;
use super::primitives::Selector;
use super::schema::{CallRecord, TraceAnalysis};
use crate::utils::error::AnalysisError;
use crate::utils::policy::TraversalLimits;
use log::debug;
use std::collections::BTreeSet;

/// Flatten a normalized call tree
///
/// **Public** - main entry point for flattening
///
/// # Arguments
/// * `root` - Normalized root frame
/// * `limits` - Depth and frame-count guards
///
/// # Returns
/// Calls in entry order, maximum depth, touched contracts and gas total
///
/// # Errors
/// * `AnalysisError::TraceTooDeep` - Nesting exceeds `limits.max_depth`
/// * `AnalysisError::TooManyCalls` - More than `limits.max_calls` frames
pub fn flatten(root: &TraceNode, limits: &TraversalLimits) -> Result<TraceAnalysis, AnalysisError> {
    let mut calls: Vec<CallRecord> = Vec::new();
    let mut contracts = BTreeSet::new();
    let mut max_depth: u32 = 0;
    let mut total_gas_used: u64 = 0;

    let mut pending: Vec<(&TraceNode, u32)> = vec![(root, 0)];

    while let Some((node, depth)) = pending.pop() {
        if depth > limits.max_depth {
            return Err(AnalysisError::TraceTooDeep {
                limit: limits.max_depth,
            });
        }
        if calls.len() >= limits.max_calls {
            return Err(AnalysisError::TooManyCalls {
                limit: limits.max_calls,
            });
        }

        max_depth = max_depth.max(depth);
        total_gas_used = total_gas_used.saturating_add(node.gas_used);

        for address in [&node.from, &node.to] {
            if !address.is_zero() {
                contracts.insert(address.clone());
            }
        }

        calls.push(to_call_record(node, depth));

        // Reverse so the first child is popped next
        pending.extend(node.calls.iter().rev().map(|child| (child, depth + 1)));
    }

    debug!(
        "Flattened {} calls, max depth {}, {} contracts",
        calls.len(),
        max_depth,
        contracts.len()
    );

    Ok(TraceAnalysis {
        calls,
        total_gas_used,
        depth: max_depth,
        contracts_involved: contracts,
    })
}

/// Convert one frame to a call record
///
/// **Private** - internal conversion
fn to_call_record(node: &TraceNode, depth: u32) -> CallRecord {
    let selector = Selector::from_input(&node.input);

    CallRecord {
        from: node.from.clone(),
        to: node.to.clone(),
        value: node.value.clone(),
        data: node.input.clone(),
        function_name: selector.to_string(),
        selector,
        call_type: node.call_type,
        gas_used: node.gas_used,
        success: node.success(),
        depth,
        error: node.error.clone(),
    }
}
