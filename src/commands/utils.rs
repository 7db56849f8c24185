use crate::output::read_result;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::policy::{load_policy, AnalysisPolicy};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Check a transaction hash: 32 bytes of hex, `0x` prefix optional
pub fn validate_tx_hash(tx_hash: &str) -> Result<()> {
    if tx_hash.is_empty() {
        anyhow::bail!("Transaction hash cannot be empty");
    }

    let hex = tx_hash
        .strip_prefix("0x")
        .or_else(|| tx_hash.strip_prefix("0X"))
        .unwrap_or(tx_hash);

    if hex.len() != 64 {
        anyhow::bail!("Transaction hash must be 32 bytes (64 hex characters)");
    }

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        anyhow::bail!("Transaction hash contains invalid characters");
    }

    Ok(())
}

/// Check the number of functions requested for summaries
pub fn validate_top_functions(top_functions: usize) -> Result<()> {
    if top_functions == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if top_functions > 1000 {
        anyhow::bail!("top is too large (max 1000)");
    }

    Ok(())
}

/// Default policy, or the one in `path`
pub fn resolve_policy(path: Option<&Path>) -> Result<AnalysisPolicy> {
    match path {
        Some(path) => load_policy(path)
            .with_context(|| format!("Failed to load policy from {}", path.display())),
        None => Ok(AnalysisPolicy::default()),
    }
}

/// Validate an analysis result JSON file
pub fn validate_result_file(file_path: PathBuf) -> Result<()> {
    println!("Validating analysis: {}", file_path.display());

    let result = read_result(&file_path)?;

    println!("✓ Valid analysis JSON");
    println!("  Version: {}", result.version);
    println!("  Transaction: {}", result.tx_hash);
    println!("  Calls: {}", result.trace_analysis.call_count());
    println!("  Total Gas: {}", result.gas_profile.total_gas);
    println!("  Functions: {}", result.gas_profile.function_analyses.len());
    println!("  Findings: {}", result.vulnerability_report.total_issues());

    Ok(())
}

/// Print the effective policy as TOML
pub fn display_policy(path: Option<PathBuf>) -> Result<()> {
    let policy = resolve_policy(path.as_deref())?;
    let rendered = toml::to_string_pretty(&policy).context("Failed to render policy")?;

    println!("# Effective analysis policy");
    println!("{}", rendered);

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Tx Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Result Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call-trace flattening, gas profiling and heuristic findings for EVM transactions.");
}
