//! Tx Trace Studio
//!
//! Call-trace analysis for EVM transactions: takes the nested call tree
//! returned by a debug tracer and produces
//!
//! - a flattened call list with depth and the contracts touched,
//! - gas usage grouped by function selector, with efficiency and hints,
//! - heuristic security findings (value-bearing calls suggestive of
//!   reentrancy, plus optional extended rules).
//!
//! The analysis core (`parser`, `aggregator`, `scanner`, `analysis`) is
//! pure and synchronous. `rpc`, `output` and `commands` back the
//! `tx-trace` CLI.
//!
//! ```ignore
//! use tx_trace_studio::analysis::{AnalysisInput, TransactionAnalyzer};
//! use tx_trace_studio::parser::parse_call_trace;
//!
//! let root = parse_call_trace(&raw_json)?;
//! let result = TransactionAnalyzer::default().analyze(AnalysisInput {
//!     tx_hash: "0x...".to_string(),
//!     root,
//!     gas_used: 21_000,
//!     gas_limit: 30_000,
//!     state_diff: None,
//! })?;
//! ```

pub mod aggregator;
pub mod analysis;
pub mod commands;
pub mod output;
pub mod parser;
pub mod rpc;
pub mod scanner;
pub mod utils;
