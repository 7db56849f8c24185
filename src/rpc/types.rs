//! Types for JSON-RPC communication with an Ethereum node.
//!
//! Based on the Ethereum JSON-RPC spec and geth's debug_traceTransaction extension.

use crate::utils::config::CALL_TRACER;
use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: u64,
}

impl JsonRpcRequest {
    pub fn new(method: &str, params: serde_json::Value, id: u64) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id,
        }
    }

    /// Request for debug_traceTransaction with the call tracer
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash (with 0x prefix)
    /// * `id` - Request ID (for response correlation)
    pub fn debug_trace_transaction(tx_hash: &str, id: u64) -> Self {
        Self::new(
            "debug_traceTransaction",
            serde_json::json!([tx_hash, { "tracer": CALL_TRACER }]),
            id,
        )
    }
}

/// JSON-RPC 2.0 response structure
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Raw call trace (opaque here, normalized by the parser)
pub type RawTraceData = serde_json::Value;

/// Gas figures for a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionGas {
    /// `gas` field of the transaction
    pub gas_limit: u64,
    /// `gasUsed` field of the receipt
    pub gas_used: u64,
}
