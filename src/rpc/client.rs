//! HTTP client for fetching call traces and receipts from a node.

use super::types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RawTraceData, TransactionGas};
use crate::parser::call_trace::{from_reader_unbounded, parse_json_u64};
use crate::utils::config::DEFAULT_RPC_TIMEOUT;
use crate::utils::error::RpcError;
use log::{debug, info};
use reqwest::blocking::Client;

/// RPC client for fetching transaction data
pub struct RpcClient {
    client: Client,
    rpc_url: String,
}

impl RpcClient {
    /// Create a new RPC client
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(DEFAULT_RPC_TIMEOUT)
            .build()
            .map_err(RpcError::RequestFailed)?;

        Ok(Self {
            client,
            rpc_url: rpc_url.into(),
        })
    }

    /// Fetch the call tree of a transaction via `callTracer`
    pub fn debug_trace_transaction(&self, tx_hash: &str) -> Result<RawTraceData, RpcError> {
        let tx_hash = normalize_tx_hash(tx_hash);

        info!("Fetching call trace for transaction: {}", tx_hash);

        let request = JsonRpcRequest::debug_trace_transaction(&tx_hash, 1);
        self.send(&request, &tx_hash)
    }

    /// Fetch gas limit (transaction) and gas used (receipt)
    pub fn transaction_gas(&self, tx_hash: &str) -> Result<TransactionGas, RpcError> {
        let tx_hash = normalize_tx_hash(tx_hash);

        let tx = self.send(
            &JsonRpcRequest::new("eth_getTransactionByHash", serde_json::json!([tx_hash]), 2),
            &tx_hash,
        )?;
        let receipt = self.send(
            &JsonRpcRequest::new("eth_getTransactionReceipt", serde_json::json!([tx_hash]), 3),
            &tx_hash,
        )?;

        let gas_limit = read_quantity(&tx, "gas", &tx_hash)?;
        let gas_used = read_quantity(&receipt, "gasUsed", &tx_hash)?;

        debug!("Gas for {}: used {} of {}", tx_hash, gas_used, gas_limit);

        Ok(TransactionGas {
            gas_limit,
            gas_used,
        })
    }

    /// POST one request and unwrap its result
    fn send(&self, request: &JsonRpcRequest, tx_hash: &str) -> Result<serde_json::Value, RpcError> {
        debug!("RPC request: {:?}", request);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(request)
            .send()
            .map_err(RpcError::RequestFailed)?;

        if !response.status().is_success() {
            return Err(RpcError::InvalidResponse(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().unwrap_or_default()
            )));
        }

        let body = response.text().map_err(RpcError::RequestFailed)?;
        let rpc_response: JsonRpcResponse<serde_json::Value> =
            from_reader_unbounded(body.as_bytes()).map_err(|e| {
                RpcError::InvalidResponse(format!("Malformed JSON-RPC response: {}", e))
            })?;

        if let Some(error) = rpc_response.error {
            return Err(map_rpc_error(error, tx_hash));
        }

        match rpc_response.result {
            Some(serde_json::Value::Null) | None => {
                Err(RpcError::TransactionNotFound(tx_hash.to_string()))
            }
            Some(result) => Ok(result),
        }
    }
}

/// Read a hex quantity field from an RPC object
fn read_quantity(obj: &serde_json::Value, field: &str, tx_hash: &str) -> Result<u64, RpcError> {
    let value = obj.get(field).ok_or_else(|| {
        RpcError::InvalidResponse(format!("Missing '{}' for transaction {}", field, tx_hash))
    })?;

    parse_json_u64(value).map_err(|e| RpcError::InvalidResponse(format!("Bad '{}': {}", field, e)))
}

/// Normalize transaction hash to include 0x prefix
pub fn normalize_tx_hash(tx_hash: &str) -> String {
    let trimmed = tx_hash.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        format!("0x{}", trimmed[2..].to_ascii_lowercase())
    } else {
        format!("0x{}", trimmed.to_ascii_lowercase())
    }
}

/// Map JSON-RPC error to our error type
fn map_rpc_error(error: JsonRpcError, tx_hash: &str) -> RpcError {
    match error.code {
        -32000 => {
            if error.message.to_lowercase().contains("not found") {
                RpcError::TransactionNotFound(tx_hash.to_string())
            } else {
                RpcError::InvalidResponse(error.message)
            }
        }
        -32601 => RpcError::TracerNotSupported,
        _ => RpcError::InvalidResponse(format!("{}: {}", error.code, error.message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tx_hash() {
        assert_eq!(normalize_tx_hash("abc123"), "0xabc123");
        assert_eq!(normalize_tx_hash("0xDEF456"), "0xdef456");
        assert_eq!(normalize_tx_hash("0XABC"), "0xabc");
    }

    #[test]
    fn test_map_rpc_error() {
        let not_found = JsonRpcError {
            code: -32000,
            message: "transaction not found".to_string(),
            data: None,
        };
        assert!(matches!(
            map_rpc_error(not_found, "0x1"),
            RpcError::TransactionNotFound(_)
        ));

        let unsupported = JsonRpcError {
            code: -32601,
            message: "the method debug_traceTransaction does not exist".to_string(),
            data: None,
        };
        assert!(matches!(
            map_rpc_error(unsupported, "0x1"),
            RpcError::TracerNotSupported
        ));
    }

    #[test]
    fn test_deep_trace_response_parses() {
        let depth = 200;
        let body = format!(
            r#"{{"jsonrpc":"2.0","id":1,"result":{}{{}}{}}}"#,
            r#"{"calls":["#.repeat(depth),
            "]}".repeat(depth)
        );

        let response: JsonRpcResponse<serde_json::Value> =
            from_reader_unbounded(body.as_bytes()).unwrap();
        assert!(response.error.is_none());
        assert!(response.result.unwrap().is_object());
    }

    #[test]
    fn test_read_quantity() {
        let receipt = serde_json::json!({ "gasUsed": "0x5208" });
        assert_eq!(read_quantity(&receipt, "gasUsed", "0x1").unwrap(), 21_000);
        assert!(read_quantity(&receipt, "gas", "0x1").is_err());
    }
}
