//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads a raw call trace (and optional state diff) from disk
//! 2. Normalizes and flattens the trace
//! 3. Builds the gas profile and scans for findings
//! 4. Writes the result JSON

use super::models::AnalyzeArgs;
use super::utils::{resolve_policy, validate_top_functions, validate_tx_hash};
use crate::analysis::{AnalysisInput, StateDiff, TransactionAnalysisResult, TransactionAnalyzer};
use crate::output::{render_summary, write_result};
use crate::parser::call_trace::from_reader_unbounded;
use crate::parser::parse_call_trace;
use crate::rpc::normalize_tx_hash;
use crate::utils::policy::AnalysisPolicy;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Gas figures to analyze against; `None` falls back to the root frame
#[derive(Debug, Clone, Copy, Default)]
pub struct GasFigures {
    pub gas_limit: Option<u64>,
    pub gas_used: Option<u64>,
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable trace, state-diff or policy files
/// * Trace tripping a traversal guard
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Analyzing trace file: {}", args.trace_path.display());

    let policy = resolve_policy(args.policy_path.as_deref())?;

    let raw_trace = read_json(&args.trace_path).context("Failed to read trace file")?;

    let state_diff = match &args.state_diff_path {
        Some(path) => {
            let value = read_json(path).context("Failed to read state diff file")?;
            let diff: StateDiff =
                serde_json::from_value(value).context("State diff has an unexpected shape")?;
            Some(diff)
        }
        None => None,
    };

    let gas = GasFigures {
        gas_limit: args.gas_limit,
        gas_used: args.gas_used,
    };

    let result = run_pipeline(&args.transaction_hash, &raw_trace, gas, state_diff, policy)?;

    finish(&result, &args.output_json, args.print_summary, args.top_functions)?;

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Parse, analyze and assemble one transaction
///
/// **Public** - shared by analyze and capture
pub fn run_pipeline(
    tx_hash: &str,
    raw_trace: &serde_json::Value,
    gas: GasFigures,
    state_diff: Option<StateDiff>,
    policy: AnalysisPolicy,
) -> Result<TransactionAnalysisResult> {
    let root = parse_call_trace(raw_trace).context("Failed to parse call trace")?;

    let gas_limit = gas.gas_limit.unwrap_or(root.gas);
    let gas_used = gas.gas_used.unwrap_or(root.gas_used);
    debug!("Using gas used {} of limit {}", gas_used, gas_limit);

    let analyzer = TransactionAnalyzer::new(policy).context("Invalid analysis policy")?;
    let result = analyzer
        .analyze(AnalysisInput {
            tx_hash: normalize_tx_hash(tx_hash),
            root,
            gas_used,
            gas_limit,
            state_diff,
        })
        .context("Failed to analyze call trace")?;

    Ok(result)
}

/// Write the result and optionally print the summary
///
/// **Public** - shared by analyze and capture
pub fn finish(
    result: &TransactionAnalysisResult,
    output_json: &Path,
    print_summary: bool,
    top_functions: usize,
) -> Result<()> {
    write_result(result, output_json).context("Failed to write analysis JSON")?;
    info!("✓ Analysis written to: {}", output_json.display());

    if print_summary {
        let summary =
            render_summary(result, top_functions).context("Failed to render summary")?;
        println!("\n{}", summary);
    }

    Ok(())
}

/// Validate analyze arguments before doing any work
pub fn validate_analyze_args(args: &AnalyzeArgs) -> Result<()> {
    validate_tx_hash(&args.transaction_hash)?;
    validate_top_functions(args.top_functions)?;

    if args.trace_path.as_os_str().is_empty() {
        anyhow::bail!("Trace path cannot be empty");
    }

    Ok(())
}

/// Read a JSON file into a value
///
/// **Private** - internal helper
fn read_json(path: &Path) -> Result<serde_json::Value> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let value: serde_json::Value = from_reader_unbounded(BufReader::new(file))
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(value)
}
