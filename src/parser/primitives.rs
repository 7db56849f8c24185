//! Value types for addresses, selectors and call types.
//!
//! Addresses and selectors are stored lower-cased so that equality,
//! hashing and ordering ignore the casing the tracer happened to emit.

use crate::utils::config::{EMPTY_SELECTOR, SELECTOR_LEN, ZERO_ADDRESS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// EVM account address in canonical (lower-case, `0x`-prefixed) form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Canonicalize an address string. Empty input becomes the zero address.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::zero();
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("0x") {
            Self(lower)
        } else {
            Self(format!("0x{}", lower))
        }
    }

    pub fn zero() -> Self {
        Self(ZERO_ADDRESS.to_string())
    }

    /// True when every hex digit is zero
    pub fn is_zero(&self) -> bool {
        let digits = self.0.trim_start_matches("0x");
        digits.chars().all(|c| c == '0')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Address {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 4-byte function selector, rendered as `0x` + 8 hex digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Selector(String);

impl Selector {
    /// Sentinel for calls without a selector (plain value transfers)
    pub fn empty() -> Self {
        Self(EMPTY_SELECTOR.to_string())
    }

    /// First 10 characters of call data (`0x` + 4 bytes), or the empty
    /// selector when there are fewer. Counted in characters, not bytes.
    pub fn from_input(input: &str) -> Self {
        let prefix: String = input.chars().take(SELECTOR_LEN).collect();
        if prefix.chars().count() == SELECTOR_LEN {
            Self(prefix.to_ascii_lowercase())
        } else {
            Self::empty()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == EMPTY_SELECTOR
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Selector {
    fn from(raw: String) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }
}

impl From<&str> for Selector {
    fn from(raw: &str) -> Self {
        Self(raw.trim().to_ascii_lowercase())
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// EVM call mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallType {
    Call,
    DelegateCall,
    StaticCall,
    Create,
    Create2,
}

impl CallType {
    /// Strict recognition of a tracer `type` string (case-insensitive)
    pub fn recognize(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CALL" => Some(Self::Call),
            "DELEGATECALL" => Some(Self::DelegateCall),
            "STATICCALL" => Some(Self::StaticCall),
            "CREATE" => Some(Self::Create),
            "CREATE2" => Some(Self::Create2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::DelegateCall => "DELEGATECALL",
            Self::StaticCall => "STATICCALL",
            Self::Create => "CREATE",
            Self::Create2 => "CREATE2",
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_case_insensitive() {
        let upper = Address::new("0xABCDEF0000000000000000000000000000000001");
        let lower = Address::new("0xabcdef0000000000000000000000000000000001");
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "0xabcdef0000000000000000000000000000000001");
    }

    #[test]
    fn test_address_zero() {
        assert!(Address::zero().is_zero());
        assert!(Address::new("").is_zero());
        assert!(!Address::new("0x00000000000000000000000000000000000000b0").is_zero());
    }

    #[test]
    fn test_address_adds_prefix() {
        assert_eq!(Address::new("AbC").as_str(), "0xabc");
    }

    #[test]
    fn test_selector_extraction() {
        assert_eq!(Selector::from_input("0xA9059CBB0000").as_str(), "0xa9059cbb");
        assert_eq!(Selector::from_input("0xa9059cbb").as_str(), "0xa9059cbb");
        assert!(Selector::from_input("0x").is_empty());
        assert!(Selector::from_input("").is_empty());
        assert!(Selector::from_input("0xa9059c").is_empty());
    }

    #[test]
    fn test_selector_counts_characters() {
        assert_eq!(Selector::from_input("0x1234567éff").as_str(), "0x1234567é");
        assert!(Selector::from_input("0x12345é").is_empty());
    }

    #[test]
    fn test_call_type_recognition() {
        assert_eq!(CallType::recognize("delegatecall"), Some(CallType::DelegateCall));
        assert_eq!(CallType::recognize("StaticCall"), Some(CallType::StaticCall));
        assert_eq!(CallType::recognize("CREATE2"), Some(CallType::Create2));
        assert_eq!(CallType::recognize("CALLCODE"), None);
    }

    #[test]
    fn test_call_type_serialization() {
        let json = serde_json::to_string(&CallType::DelegateCall).unwrap();
        assert_eq!(json, "\"DELEGATECALL\"");
    }

    #[test]
    fn test_address_deserialize_canonicalizes() {
        let address: Address = serde_json::from_str("\"0xDEADBEEF\"").unwrap();
        assert_eq!(address.as_str(), "0xdeadbeef");
    }
}
