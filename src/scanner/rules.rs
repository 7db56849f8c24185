//! Heuristic rules over a flattened call list.
//!
//! Each rule looks at the whole call sequence and emits at most one
//! finding, aggregating every matching call into it.

use super::schema::{Severity, Vulnerability};
use crate::parser::primitives::{Address, CallType};
use crate::parser::schema::CallRecord;
use std::collections::BTreeSet;

pub const REENTRANCY_ID: &str = "REENTRANCY";
pub const UNCHECKED_CALL_ID: &str = "UNCHECKED_CALL";
pub const DANGEROUS_DELEGATECALL_ID: &str = "DANGEROUS_DELEGATECALL";

/// Inputs shared by every rule
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub calls: &'a [CallRecord],

    /// Contracts with recorded storage writes, when state-diff data exists
    pub storage_changes: Option<&'a BTreeSet<Address>>,
}

/// Value-bearing CALLs in a transaction with more than one call
///
/// The value test is textual: only `"0"` and `"0x0"` count as zero.
pub fn detect_reentrancy(ctx: &ScanContext<'_>) -> Option<Vulnerability> {
    if ctx.calls.len() <= 1 {
        return None;
    }

    let flagged: Vec<&CallRecord> = ctx.calls.iter().filter(|c| c.transfers_value()).collect();
    if flagged.is_empty() {
        return None;
    }

    let mut description = format!(
        "{} value-bearing external call(s) in a transaction with {} calls. \
         The recipient can run code and re-enter the caller before its state is final.",
        flagged.len(),
        ctx.calls.len()
    );

    if let Some(storage) = ctx.storage_changes {
        let recipients: BTreeSet<&Address> = flagged.iter().map(|c| &c.to).collect();
        let written = recipients.iter().filter(|a| storage.contains(**a)).count();
        description.push_str(&format!(
            " {} of {} recipient contract(s) also recorded storage writes.",
            written,
            recipients.len()
        ));
    }

    Some(build_finding(
        REENTRANCY_ID,
        "Potential Reentrancy",
        Severity::High,
        description,
        "Apply checks-effects-interactions: update state before transferring value, \
         or guard the function with a reentrancy lock",
        &flagged,
    ))
}

/// Failed CALLs whose caller frame still succeeded
pub fn detect_unchecked_calls(ctx: &ScanContext<'_>) -> Option<Vulnerability> {
    // success flag of each ancestor on the current path, indexed by depth
    let mut path: Vec<bool> = Vec::new();
    let mut flagged: Vec<&CallRecord> = Vec::new();

    for call in ctx.calls {
        path.truncate(call.depth as usize);
        let parent_succeeded = path.last().copied();

        if call.call_type == CallType::Call && !call.success && parent_succeeded == Some(true) {
            flagged.push(call);
        }

        path.push(call.success);
    }

    if flagged.is_empty() {
        return None;
    }

    Some(build_finding(
        UNCHECKED_CALL_ID,
        "Unchecked External Call",
        Severity::Medium,
        format!(
            "{} external call(s) failed while the calling frame completed successfully",
            flagged.len()
        ),
        "Check the success flag of low-level calls and revert or handle the failure",
        &flagged,
    ))
}

/// DELEGATECALLs, which run foreign code against the caller's storage
pub fn detect_delegatecalls(ctx: &ScanContext<'_>) -> Option<Vulnerability> {
    let flagged: Vec<&CallRecord> = ctx
        .calls
        .iter()
        .filter(|c| c.call_type == CallType::DelegateCall)
        .collect();

    if flagged.is_empty() {
        return None;
    }

    Some(build_finding(
        DANGEROUS_DELEGATECALL_ID,
        "Delegatecall To External Code",
        Severity::Medium,
        format!(
            "{} delegatecall(s) executed external code in the caller's storage context",
            flagged.len()
        ),
        "Make sure delegatecall targets are fixed or restricted to trusted implementations",
        &flagged,
    ))
}

/// Aggregate flagged calls into one finding
///
/// **Private** - shared by every rule
fn build_finding(
    id: &str,
    name: &str,
    severity: Severity,
    description: String,
    recommendation: &str,
    flagged: &[&CallRecord],
) -> Vulnerability {
    Vulnerability {
        id: id.to_string(),
        name: name.to_string(),
        severity,
        description,
        recommendation: recommendation.to_string(),
        affected_contracts: flagged.iter().map(|c| c.to.clone()).collect(),
        affected_functions: flagged.iter().map(|c| c.selector.clone()).collect(),
        occurrence_count: u32::try_from(flagged.len()).unwrap_or(u32::MAX),
    }
}
