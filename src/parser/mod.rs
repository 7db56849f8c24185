//! Trace parsing and flattening.
//!
//! This module handles:
//! - Reading raw JSON from callTracer
//! - Normalizing frames (defaults for every missing field)
//! - Flattening the call tree into entry order
//! - Address/selector value types

pub mod call_trace;
pub mod flatten;
pub mod primitives;
pub mod schema;

// Re-export main types
pub use call_trace::{normalize, parse_call_trace, RawCallFrame, TraceNode};
pub use flatten::flatten;
pub use primitives::{Address, CallType, Selector};
pub use schema::{CallRecord, TraceAnalysis};
