use crate::utils::config::DEFAULT_TOP_FUNCTIONS;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to raw callTracer JSON
    pub trace_path: PathBuf,

    /// Transaction hash the trace belongs to
    pub transaction_hash: String,

    /// Gas limit; defaults to the root frame's `gas`
    pub gas_limit: Option<u64>,

    /// Gas used; defaults to the root frame's `gasUsed`
    pub gas_used: Option<u64>,

    /// Optional state-diff JSON passed through to the result
    pub state_diff_path: Option<PathBuf>,

    /// Output path for JSON result
    pub output_json: PathBuf,

    /// Number of functions listed in the summary
    pub top_functions: usize,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Optional policy TOML
    pub policy_path: Option<PathBuf>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            trace_path: PathBuf::from("trace.json"),
            transaction_hash: String::new(),
            gas_limit: None,
            gas_used: None,
            state_diff_path: None,
            output_json: PathBuf::from("analysis.json"),
            top_functions: DEFAULT_TOP_FUNCTIONS,
            print_summary: false,
            policy_path: None,
        }
    }
}

/// Arguments for the capture command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CaptureArgs {
    /// RPC endpoint URL
    pub rpc_url: String,

    /// Transaction hash to analyze
    pub transaction_hash: String,

    /// Output path for JSON result
    pub output_json: PathBuf,

    /// Number of functions listed in the summary
    pub top_functions: usize,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Optional policy TOML
    pub policy_path: Option<PathBuf>,
}

impl Default for CaptureArgs {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            transaction_hash: String::new(),
            output_json: PathBuf::from("analysis.json"),
            top_functions: DEFAULT_TOP_FUNCTIONS,
            print_summary: false,
            policy_path: None,
        }
    }
}
