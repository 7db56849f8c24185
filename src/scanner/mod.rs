//! Heuristic vulnerability scanning over flattened calls.
//!
//! This is pattern matching on a call trace, not bytecode analysis:
//! findings are hints for a human reviewer.

pub mod rules;
pub mod schema;

pub use rules::{ScanContext, DANGEROUS_DELEGATECALL_ID, REENTRANCY_ID, UNCHECKED_CALL_ID};
pub use schema::{Severity, Vulnerability, VulnerabilityReport};

use crate::parser::primitives::Address;
use crate::parser::schema::CallRecord;
use crate::utils::policy::ScannerPolicy;
use log::{debug, info};
use std::collections::BTreeSet;

/// Run every enabled rule over the call list
///
/// **Public** - main entry point for scanning
///
/// # Arguments
/// * `calls` - Flattened calls in entry order
/// * `storage_changes` - Contracts with storage writes, if known
/// * `policy` - Which rules to run
///
/// # Returns
/// Report with one finding per triggered rule; empty for empty input
pub fn scan(
    calls: &[CallRecord],
    storage_changes: Option<&BTreeSet<Address>>,
    policy: &ScannerPolicy,
) -> VulnerabilityReport {
    let ctx = ScanContext {
        calls,
        storage_changes,
    };

    let mut findings = Vec::new();
    findings.extend(rules::detect_reentrancy(&ctx));

    if policy.extended_rules {
        debug!("Running extended rules");
        findings.extend(rules::detect_unchecked_calls(&ctx));
        findings.extend(rules::detect_delegatecalls(&ctx));
    }

    for finding in &findings {
        info!(
            "{} [{}]: {} occurrence(s)",
            finding.id, finding.severity, finding.occurrence_count
        );
    }

    VulnerabilityReport::new(findings)
}
