//! Tx Trace Studio CLI
//!
//! Flattens EVM call traces, profiles gas by function and reports
//! heuristic security findings.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use tx_trace_studio::commands::{
    display_policy, display_version, execute_analyze, execute_capture, validate_analyze_args,
    validate_args, validate_result_file, AnalyzeArgs, CaptureArgs,
};

/// Tx Trace Studio - call-trace analysis for EVM transactions
#[derive(Parser, Debug)]
#[command(name = "tx-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a callTracer JSON file
    Analyze {
        /// Path to raw call trace JSON
        #[arg(long)]
        trace: PathBuf,

        /// Transaction hash the trace belongs to
        #[arg(short, long)]
        tx: String,

        /// Gas limit (defaults to the root frame's gas)
        #[arg(long)]
        gas_limit: Option<u64>,

        /// Gas used (defaults to the root frame's gasUsed)
        #[arg(long)]
        gas_used: Option<u64>,

        /// Optional state-diff JSON to include in the result
        #[arg(long)]
        state_diff: Option<PathBuf>,

        /// Output path for JSON result
        #[arg(short, long, default_value = "artifacts/analysis.json")]
        output: PathBuf,

        /// Number of top gas consumers in the summary
        #[arg(long, default_value = "10")]
        top: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Policy TOML overriding thresholds and limits
        #[arg(long, env = "TX_TRACE_POLICY")]
        policy: Option<PathBuf>,
    },

    /// Fetch a transaction over RPC and analyze it
    Capture {
        /// RPC endpoint URL
        #[arg(short, long, default_value = "http://localhost:8545", env = "TX_TRACE_RPC")]
        rpc: String,

        /// Transaction hash to analyze
        #[arg(short, long)]
        tx: String,

        /// Output path for JSON result
        #[arg(short, long, default_value = "artifacts/analysis.json")]
        output: PathBuf,

        /// Number of top gas consumers in the summary
        #[arg(long, default_value = "10")]
        top: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Policy TOML overriding thresholds and limits
        #[arg(long, env = "TX_TRACE_POLICY")]
        policy: Option<PathBuf>,
    },

    /// Validate an analysis JSON file
    Validate {
        /// Path to analysis JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the effective analysis policy
    Policy {
        /// Policy TOML to load instead of the defaults
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            trace,
            tx,
            gas_limit,
            gas_used,
            state_diff,
            output,
            top,
            summary,
            policy,
        } => {
            let args = AnalyzeArgs {
                trace_path: trace,
                transaction_hash: tx,
                gas_limit,
                gas_used,
                state_diff_path: state_diff,
                output_json: output,
                top_functions: top,
                print_summary: summary,
                policy_path: policy,
            };

            validate_analyze_args(&args)?;
            execute_analyze(args)?;
        }

        Commands::Capture {
            rpc,
            tx,
            output,
            top,
            summary,
            policy,
        } => {
            let args = CaptureArgs {
                rpc_url: rpc,
                transaction_hash: tx,
                output_json: output,
                top_functions: top,
                print_summary: summary,
                policy_path: policy,
            };

            validate_args(&args)?;
            execute_capture(args)?;
        }

        Commands::Validate { file } => {
            validate_result_file(file)?;
        }

        Commands::Policy { file } => {
            display_policy(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
