//! Result assembly and the end-to-end analysis pipeline.
//!
//! The pipeline is: flatten -> aggregate gas -> scan -> assemble. Each
//! stage only reads the output of the flattener, and nothing is shared
//! between analyses, so separate transactions can be analyzed in parallel
//! by separate `TransactionAnalyzer`s (or one shared by reference).

pub mod clock;
pub mod state_diff;

pub use clock::{Clock, FixedClock, SystemClock};
pub use state_diff::{BalanceChange, StateDiff, StorageChange, Transfer};

use crate::aggregator::{build_gas_profile, GasProfile};
use crate::parser::{flatten, TraceAnalysis, TraceNode};
use crate::scanner::{scan, VulnerabilityReport};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::{AnalysisError, PolicyError};
use crate::utils::policy::AnalysisPolicy;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything known about one analyzed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAnalysisResult {
    /// Output schema version
    pub version: String,
    pub tx_hash: String,
    pub trace_analysis: TraceAnalysis,
    pub gas_profile: GasProfile,
    #[serde(default)]
    pub state_diff: Option<StateDiff>,
    pub vulnerability_report: VulnerabilityReport,
    pub timestamp: DateTime<Utc>,
}

/// Combine stage outputs into a result stamped with `clock.now()`
pub fn assemble(
    tx_hash: impl Into<String>,
    trace_analysis: TraceAnalysis,
    gas_profile: GasProfile,
    state_diff: Option<StateDiff>,
    vulnerability_report: VulnerabilityReport,
    clock: &dyn Clock,
) -> TransactionAnalysisResult {
    TransactionAnalysisResult {
        version: SCHEMA_VERSION.to_string(),
        tx_hash: tx_hash.into(),
        trace_analysis,
        gas_profile,
        state_diff,
        vulnerability_report,
        timestamp: clock.now(),
    }
}

/// Already-fetched inputs for one transaction
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub tx_hash: String,
    pub root: TraceNode,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub state_diff: Option<StateDiff>,
}

/// Runs the four-stage pipeline under one policy
pub struct TransactionAnalyzer<C: Clock = SystemClock> {
    policy: AnalysisPolicy,
    clock: C,
}

impl TransactionAnalyzer<SystemClock> {
    /// Analyzer for a checked policy
    ///
    /// # Errors
    /// * `PolicyError::Invalid` - the policy fails `AnalysisPolicy::validate`
    pub fn new(policy: AnalysisPolicy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            policy,
            clock: SystemClock,
        })
    }
}

impl Default for TransactionAnalyzer<SystemClock> {
    fn default() -> Self {
        Self {
            policy: AnalysisPolicy::default(),
            clock: SystemClock,
        }
    }
}

impl<C: Clock> TransactionAnalyzer<C> {
    /// Swap the time source (tests use `FixedClock`)
    pub fn with_clock<D: Clock>(self, clock: D) -> TransactionAnalyzer<D> {
        TransactionAnalyzer {
            policy: self.policy,
            clock,
        }
    }

    pub fn policy(&self) -> &AnalysisPolicy {
        &self.policy
    }

    /// Analyze one transaction
    ///
    /// # Errors
    /// * `AnalysisError::TraceTooDeep` / `AnalysisError::TooManyCalls` -
    ///   the trace trips a traversal guard
    pub fn analyze(&self, input: AnalysisInput) -> Result<TransactionAnalysisResult, AnalysisError> {
        let AnalysisInput {
            tx_hash,
            root,
            gas_used,
            gas_limit,
            state_diff,
        } = input;

        debug!("Analyzing transaction: {}", tx_hash);

        let trace_analysis = flatten(&root, &self.policy.limits)?;

        let gas_profile = build_gas_profile(&trace_analysis.calls, gas_used, gas_limit, &self.policy.gas);

        let storage_changes = state_diff.as_ref().map(StateDiff::storage_changed_contracts);
        let vulnerability_report = scan(
            &trace_analysis.calls,
            storage_changes.as_ref(),
            &self.policy.scanner,
        );

        info!(
            "Analyzed {}: {} calls, depth {}, {} functions, {} issue(s)",
            tx_hash,
            trace_analysis.call_count(),
            trace_analysis.depth,
            gas_profile.function_analyses.len(),
            vulnerability_report.total_issues()
        );

        Ok(assemble(
            tx_hash,
            trace_analysis,
            gas_profile,
            state_diff,
            vulnerability_report,
            &self.clock,
        ))
    }
}
