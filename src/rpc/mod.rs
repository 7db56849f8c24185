//! JSON-RPC access to call traces and receipts.

pub mod client;
pub mod types;

pub use client::{normalize_tx_hash, RpcClient};
pub use types::{RawTraceData, TransactionGas};
