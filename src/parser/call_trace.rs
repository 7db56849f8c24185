//! Raw `callTracer` output and its normalized form.
//!
//! Tracer frames are loosely typed: every field may be absent, gas may be
//! a number or a hex/decimal string. `normalize` applies every default in
//! one place so the flattener never deals with missing data.

use super::primitives::{Address, CallType};
use crate::utils::config::RESULT_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// A call frame exactly as the tracer emitted it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCallFrame {
    /// Call mechanism ("CALL", "delegatecall", ...)
    #[serde(default, rename = "type")]
    pub call_type: Option<String>,

    #[serde(default)]
    pub from: Option<String>,

    #[serde(default)]
    pub to: Option<String>,

    /// Wei, as a hex or decimal string (occasionally a bare number)
    #[serde(default)]
    pub value: Option<serde_json::Value>,

    /// Gas made available to the frame
    #[serde(default)]
    pub gas: Option<serde_json::Value>,

    #[serde(default, alias = "gas_used")]
    pub gas_used: Option<serde_json::Value>,

    #[serde(default)]
    pub input: Option<String>,

    /// Present only when the frame reverted or failed
    #[serde(default)]
    pub error: Option<String>,

    /// Nested calls in execution order
    #[serde(default)]
    pub calls: Option<Vec<RawCallFrame>>,
}

/// A call frame with all defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceNode {
    pub call_type: CallType,
    pub from: Address,
    pub to: Address,
    pub value: String,
    pub gas: u64,
    pub gas_used: u64,
    pub input: String,
    pub error: Option<String>,
    pub calls: Vec<TraceNode>,
}

impl Default for TraceNode {
    fn default() -> Self {
        Self {
            call_type: CallType::Call,
            from: Address::zero(),
            to: Address::zero(),
            value: "0".to_string(),
            gas: 0,
            gas_used: 0,
            input: "0x".to_string(),
            error: None,
            calls: Vec::new(),
        }
    }
}

impl TraceNode {
    /// Plain CALL between two addresses, everything else defaulted
    pub fn new(from: impl Into<Address>, to: impl Into<Address>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Default::default()
        }
    }

    pub fn with_call_type(mut self, call_type: CallType) -> Self {
        self.call_type = call_type;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_gas(mut self, gas_used: u64) -> Self {
        self.gas_used = gas_used;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_child(mut self, child: TraceNode) -> Self {
        self.calls.push(child);
        self
    }

    /// A frame succeeded iff the tracer reported no error
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// Number of frames in this subtree, including self
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.calls.iter());
        }
        count
    }
}

/// Apply every default to a raw frame and its descendants
///
/// **Public** - the only place defaults are decided
///
/// Builds the tree with an explicit stack, so nesting depth is limited
/// only by memory.
pub fn normalize(raw: RawCallFrame) -> TraceNode {
    let (mut node, mut pending) = normalize_frame(raw);
    let mut ancestors: Vec<(TraceNode, std::vec::IntoIter<RawCallFrame>)> = Vec::new();

    loop {
        if let Some(child) = pending.next() {
            ancestors.push((node, pending));
            (node, pending) = normalize_frame(child);
            continue;
        }

        match ancestors.pop() {
            Some((mut parent, rest)) => {
                parent.calls.push(node);
                node = parent;
                pending = rest;
            }
            None => return node,
        }
    }
}

/// Normalize one frame, handing back its raw children
///
/// **Private** - internal helper for normalize
fn normalize_frame(raw: RawCallFrame) -> (TraceNode, std::vec::IntoIter<RawCallFrame>) {
    let call_type = normalize_call_type(raw.call_type.as_deref());

    let gas = read_gas_field(raw.gas.as_ref(), "gas");
    let gas_used = read_gas_field(raw.gas_used.as_ref(), "gasUsed");

    let children = raw.calls.unwrap_or_default();

    let node = TraceNode {
        call_type,
        from: raw.from.as_deref().map(Address::new).unwrap_or_else(Address::zero),
        to: raw.to.as_deref().map(Address::new).unwrap_or_else(Address::zero),
        value: normalize_value(raw.value.as_ref()),
        gas,
        gas_used,
        input: raw
            .input
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "0x".to_string()),
        error: raw.error,
        calls: Vec::with_capacity(children.len()),
    };

    (node, children.into_iter())
}

/// Map a tracer type string to a call type
///
/// Unknown or missing types become CALL. Unknown-but-present types are
/// logged since they usually mean a tracer we have not seen before.
fn normalize_call_type(raw: Option<&str>) -> CallType {
    match raw {
        None => CallType::Call,
        Some(s) if s.trim().is_empty() => CallType::Call,
        Some(s) => CallType::recognize(s).unwrap_or_else(|| {
            warn!("Unrecognized call type '{}', treating as CALL", s);
            CallType::Call
        }),
    }
}

/// Missing or unreadable gas fields become 0
///
/// **Private** - internal helper for normalize
fn read_gas_field(raw: Option<&serde_json::Value>, field: &str) -> u64 {
    match raw {
        None | Some(serde_json::Value::Null) => 0,
        Some(val) => parse_json_u64(val).unwrap_or_else(|e| {
            warn!("Unreadable {} {}, defaulting to 0: {}", field, val, e);
            0
        }),
    }
}

/// Keep value text as reported; numbers are rendered in decimal
///
/// **Private** - internal helper for normalize
fn normalize_value(raw: Option<&serde_json::Value>) -> String {
    match raw {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => "0".to_string(),
    }
}

/// Parse a raw trace JSON value into a normalized call tree
///
/// **Public** - main entry point for parsing
///
/// Accepts either a bare call frame or a JSON-RPC response that wraps
/// one in `result`.
///
/// # Errors
/// * `ParseError::InvalidFormat` - Not a JSON object
/// * `ParseError::JsonError` - Object does not have call-frame shape
pub fn parse_call_trace(raw_trace: &serde_json::Value) -> Result<TraceNode, ParseError> {
    let frame_value = unwrap_envelope(raw_trace)?;
    let raw = RawCallFrame::deserialize(serde_stacker::Deserializer::new(frame_value))?;
    let root = normalize(raw);

    debug!("Parsed call trace with {} frames", root.node_count());

    Ok(root)
}

/// Strip a JSON-RPC envelope if present
///
/// **Private** - internal helper for parse_call_trace
fn unwrap_envelope(raw_trace: &serde_json::Value) -> Result<&serde_json::Value, ParseError> {
    let obj = raw_trace.as_object().ok_or_else(|| {
        ParseError::InvalidFormat("Call trace must be a JSON object".to_string())
    })?;

    for field in RESULT_FIELD_NAMES {
        if let Some(inner) = obj.get(*field) {
            if inner.is_object() {
                debug!("Unwrapping call frame from '{}' field", field);
                return Ok(inner);
            }
        }
    }

    Ok(raw_trace)
}

/// Read JSON of any nesting depth
///
/// **Public** - used for trace files and RPC responses
///
/// Call trees nest two JSON levels per frame, so serde_json's default
/// limit of 128 stops at about 63 frames. Depth is bounded by the
/// traversal limits instead; the stack grows on demand while parsing.
pub fn from_reader_unbounded<T, R>(reader: R) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
    R: std::io::Read,
{
    let mut de = serde_json::Deserializer::from_reader(reader);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Helper to parse a u64 from various JSON types (number, string)
pub fn parse_json_u64(val: &serde_json::Value) -> Result<u64, ParseError> {
    if let Some(n) = val.as_u64() {
        Ok(n)
    } else if let Some(s) = val.as_str() {
        parse_gas_value(s)
    } else {
        Err(ParseError::InvalidFormat(format!(
            "Expected number or string, found {}",
            val
        )))
    }
}

/// Parse a gas value from hex or decimal string
pub fn parse_gas_value(value: &str) -> Result<u64, ParseError> {
    let value = value.trim();
    if let Some(hex_str) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        if hex_str.is_empty() {
            return Ok(0);
        }
        u64::from_str_radix(hex_str, 16)
            .map_err(|e| ParseError::InvalidFormat(format!("Invalid hex gas value: {}", e)))
    } else {
        value
            .parse::<u64>()
            .map_err(|e| ParseError::InvalidFormat(format!("Invalid decimal gas value: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_applies_defaults() {
        let node = normalize(RawCallFrame::default());

        assert_eq!(node.call_type, CallType::Call);
        assert!(node.from.is_zero());
        assert!(node.to.is_zero());
        assert_eq!(node.value, "0");
        assert_eq!(node.input, "0x");
        assert_eq!(node.gas_used, 0);
        assert!(node.success());
        assert!(node.calls.is_empty());
    }

    #[test]
    fn test_normalize_unknown_type_is_call() {
        let raw = RawCallFrame {
            call_type: Some("SELFDESTRUCT".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize(raw).call_type, CallType::Call);
    }

    #[test]
    fn test_normalize_lowercase_type() {
        let raw = RawCallFrame {
            call_type: Some("staticcall".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize(raw).call_type, CallType::StaticCall);
    }

    #[test]
    fn test_normalize_bad_gas_defaults_to_zero() {
        let raw = RawCallFrame {
            gas_used: Some(json!("not-gas")),
            ..Default::default()
        };
        assert_eq!(normalize(raw).gas_used, 0);
    }

    #[test]
    fn test_normalize_numeric_value() {
        let raw = RawCallFrame {
            value: Some(json!(1000)),
            ..Default::default()
        };
        assert_eq!(normalize(raw).value, "1000");
    }

    #[test]
    fn test_parse_gas_value() {
        assert_eq!(parse_gas_value("1000").unwrap(), 1000);
        assert_eq!(parse_gas_value("0x3e8").unwrap(), 1000);
        assert_eq!(parse_gas_value("0x").unwrap(), 0);
        assert!(parse_gas_value("invalid").is_err());
    }

    #[test]
    fn test_unwrap_envelope() {
        let envelope = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": { "type": "CALL", "gasUsed": "0x5208" }
        });

        let root = parse_call_trace(&envelope).unwrap();
        assert_eq!(root.gas_used, 21_000);
        assert_eq!(root.gas, 0);
    }

    #[test]
    fn test_parse_rejects_array() {
        let result = parse_call_trace(&json!([1, 2, 3]));
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_null_calls_tolerated() {
        let root = parse_call_trace(&json!({ "type": "CALL", "calls": null })).unwrap();
        assert!(root.calls.is_empty());
    }

    #[test]
    fn test_normalize_keeps_child_order() {
        let raw: RawCallFrame = serde_json::from_value(json!({
            "input": "0x00000001",
            "calls": [
                { "input": "0x00000002", "calls": [{ "input": "0x00000003" }] },
                { "input": "0x00000004" }
            ]
        }))
        .unwrap();

        let root = normalize(raw);
        assert_eq!(root.input, "0x00000001");
        assert_eq!(root.calls.len(), 2);
        assert_eq!(root.calls[0].input, "0x00000002");
        assert_eq!(root.calls[0].calls[0].input, "0x00000003");
        assert_eq!(root.calls[1].input, "0x00000004");
    }

    #[test]
    fn test_reader_accepts_deep_nesting() {
        let depth = 300;
        let text = format!(
            "{}{{}}{}",
            r#"{"calls":["#.repeat(depth),
            "]}".repeat(depth)
        );

        let value: serde_json::Value = from_reader_unbounded(text.as_bytes()).unwrap();
        let root = parse_call_trace(&value).unwrap();
        assert_eq!(root.node_count(), depth + 1);
    }

    #[test]
    fn test_reader_rejects_trailing_garbage() {
        let result: Result<serde_json::Value, _> = from_reader_unbounded(&b"{} {"[..]);
        assert!(result.is_err());
    }

    #[test]
    fn test_node_count() {
        let tree = TraceNode::default()
            .with_child(TraceNode::default().with_child(TraceNode::default()))
            .with_child(TraceNode::default());
        assert_eq!(tree.node_count(), 4);
    }
}
