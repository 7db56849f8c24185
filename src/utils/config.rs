//! Configuration and constants for the analyzer and CLI.

use std::time::Duration;

/// Default timeout for RPC requests
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Tracer requested from `debug_traceTransaction`
pub const CALL_TRACER: &str = "callTracer";

// Canonical sentinels
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const EMPTY_SELECTOR: &str = "0x00000000";

/// `0x` plus 8 hex digits
pub const SELECTOR_LEN: usize = 10;

// Traversal guards. The EVM itself caps call depth at 1024.
pub const DEFAULT_MAX_DEPTH: u32 = 1_024;
pub const DEFAULT_MAX_CALLS: usize = 100_000;

/// Default number of functions listed in text summaries
pub const DEFAULT_TOP_FUNCTIONS: usize = 10;

// Field names for the JSON-RPC envelope around a call frame
pub const RESULT_FIELD_NAMES: &[&str] = &["result", "trace"];
