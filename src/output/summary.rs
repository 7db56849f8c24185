//! Plain-text summary of an analysis result.

use crate::aggregator::{calculate_gas_distribution, top_gas_consumers};
use crate::analysis::TransactionAnalysisResult;
use std::fmt::{self, Write};

/// Render a human-readable summary
///
/// **Public** - printed by the CLI with `--summary`
///
/// # Arguments
/// * `result` - Analysis to summarize
/// * `top_n` - How many functions to list
pub fn render_summary(
    result: &TransactionAnalysisResult,
    top_n: usize,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_summary(&mut out, result, top_n)?;
    Ok(out)
}

/// Write the summary to any formatter sink
pub fn write_summary<W: Write>(
    out: &mut W,
    result: &TransactionAnalysisResult,
    top_n: usize,
) -> fmt::Result {
    let trace = &result.trace_analysis;
    let gas = &result.gas_profile;
    let report = &result.vulnerability_report;

    let rule = "=".repeat(80);

    writeln!(out, "{}", rule)?;
    writeln!(out, "TRANSACTION ANALYSIS")?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "Transaction: {}", result.tx_hash)?;
    writeln!(out, "Calls:       {} (max depth {})", trace.call_count(), trace.depth)?;
    writeln!(out, "Contracts:   {}", trace.contracts_involved.len())?;
    writeln!(out, "Failed:      {}", trace.failed_calls().count())?;
    writeln!(
        out,
        "Gas:         {} used of {} limit ({:.2}%)",
        gas.gas_used, gas.gas_limit, gas.efficiency
    )?;
    writeln!(out, "Trace gas:   {}", gas.total_gas)?;

    let distribution = calculate_gas_distribution(&gas.function_analyses);
    writeln!(out, "Functions:   {}", distribution.summary())?;

    let top = top_gas_consumers(&gas.function_analyses, top_n);
    if !top.is_empty() {
        writeln!(out, "\nTop {} gas consumers:", top.len())?;
        for (i, func) in top.iter().enumerate() {
            writeln!(
                out,
                "  {:>2}. {} {:>12} gas  {:>4} call(s)",
                i + 1,
                func.function_name,
                func.total_gas,
                func.call_count
            )?;
        }
    }

    let hints = gas
        .global_hints
        .iter()
        .chain(gas.function_analyses.iter().flat_map(|f| f.optimization_hints.iter()));
    let mut hint_lines = hints
        .map(|h| format!("  [{}] {} (~{} gas)", h.category, h.description, h.estimated_savings))
        .peekable();
    if hint_lines.peek().is_some() {
        writeln!(out, "\nOptimization hints:")?;
        for line in hint_lines {
            writeln!(out, "{}", line)?;
        }
    }

    writeln!(
        out,
        "\nFindings: {} (critical {}, high {}, medium {}, low {})",
        report.total_issues(),
        report.critical_count(),
        report.high_count(),
        report.medium_count(),
        report.low_count()
    )?;
    for finding in report.vulnerabilities() {
        writeln!(
            out,
            "  [{}] {} x{}: {}",
            finding.severity, finding.name, finding.occurrence_count, finding.description
        )?;
    }

    write!(out, "{}", rule)
}
