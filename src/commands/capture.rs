//! Capture command implementation.
//!
//! The capture command:
//! 1. Fetches the call trace from RPC
//! 2. Fetches gas limit and gas used
//! 3. Runs the analysis pipeline
//! 4. Writes output files

use super::analyze::{finish, run_pipeline, GasFigures};
use super::models::CaptureArgs;
use super::utils::{resolve_policy, validate_top_functions, validate_tx_hash};
use crate::rpc::RpcClient;
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the capture command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * RPC connection failures
/// * Trace parsing errors
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = CaptureArgs {
///     rpc_url: "http://localhost:8545".to_string(),
///     transaction_hash: "0xabc123...".to_string(),
///     print_summary: true,
///     ..Default::default()
/// };
///
/// execute_capture(args)?;
/// ```
pub fn execute_capture(args: CaptureArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting capture for transaction: {}", args.transaction_hash);
    info!("RPC endpoint: {}", args.rpc_url);

    let policy = resolve_policy(args.policy_path.as_deref())?;

    let client = RpcClient::new(&args.rpc_url).context("Failed to create RPC client")?;

    info!("Step 1/3: Fetching call trace...");
    let raw_trace = client
        .debug_trace_transaction(&args.transaction_hash)
        .with_context(|| format!("Failed to fetch trace for transaction {}", args.transaction_hash))?;

    info!("Step 2/3: Fetching gas figures...");
    let tx_gas = client
        .transaction_gas(&args.transaction_hash)
        .context("Failed to fetch transaction gas")?;

    info!("Step 3/3: Analyzing...");
    let gas = GasFigures {
        gas_limit: Some(tx_gas.gas_limit),
        gas_used: Some(tx_gas.gas_used),
    };
    let result = run_pipeline(&args.transaction_hash, &raw_trace, gas, None, policy)?;

    finish(&result, &args.output_json, args.print_summary, args.top_functions)?;

    info!(
        "Capture completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Validate capture arguments
pub fn validate_args(args: &CaptureArgs) -> Result<()> {
    if args.rpc_url.is_empty() {
        anyhow::bail!("RPC URL cannot be empty");
    }

    if !args.rpc_url.starts_with("http://") && !args.rpc_url.starts_with("https://") {
        anyhow::bail!("RPC URL must start with http:// or https://");
    }

    validate_tx_hash(&args.transaction_hash)?;
    validate_top_functions(args.top_functions)?;

    Ok(())
}
