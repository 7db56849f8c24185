//! Flattened call records and the per-transaction trace summary.

use super::primitives::{Address, CallType, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One frame of the call tree, flattened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub from: Address,

    pub to: Address,

    /// Value exactly as the tracer reported it
    pub value: String,

    /// Call data (hex)
    pub data: String,

    pub selector: Selector,

    /// No ABI resolution is attempted; this mirrors the selector
    pub function_name: String,

    pub call_type: CallType,

    pub gas_used: u64,

    pub success: bool,

    /// Nesting depth of this frame (root is 0)
    pub depth: u32,

    /// Tracer error message, if the frame failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallRecord {
    /// True for a value-bearing CALL by the textual rule: anything other
    /// than the literal `"0"` or `"0x0"` counts, including `"00"`.
    pub fn transfers_value(&self) -> bool {
        self.call_type == CallType::Call && self.value != "0" && self.value != "0x0"
    }
}

/// Result of walking a call tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceAnalysis {
    /// Calls in call-stack entry order
    pub calls: Vec<CallRecord>,

    /// Sum of `gas_used` over `calls`
    pub total_gas_used: u64,

    /// Maximum nesting depth reached
    pub depth: u32,

    /// Every non-zero `from`/`to` address
    pub contracts_involved: BTreeSet<Address>,
}

impl TraceAnalysis {
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn failed_calls(&self) -> impl Iterator<Item = &CallRecord> {
        self.calls.iter().filter(|c| !c.success)
    }
}
