//! Utility modules for configuration, policy, and error handling.

pub mod config;
pub mod error;
pub mod policy;

// Re-export commonly used error types for convenience
pub use error::{AnalysisError, OutputError, ParseError, PolicyError, RpcError};
pub use policy::{load_policy, AnalysisPolicy, TraversalLimits};
