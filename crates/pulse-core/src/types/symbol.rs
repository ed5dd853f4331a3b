//! 트레이딩 심볼 정의.
//!
//! 심볼은 스토리지 조회와 감성 레코드 전반에서 대문자로 정규화되어
//! 사용됩니다. 정규화를 생성 시점에 강제하기 위해 newtype으로 감쌉니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 거래 가능한 상품을 나타내는 트레이딩 심볼.
///
/// 생성 시 항상 대문자로 정규화됩니다 (예: "btcusdt" → "BTCUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// 새 심볼을 생성합니다. 입력은 대문자로 정규화됩니다.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_uppercase())
    }

    /// 심볼 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 비어있는 심볼인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Symbol {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

// 역직렬화에서도 정규화가 적용되어야 하므로 수동 구현합니다.
impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Symbol::new(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_uppercase_normalization() {
        assert_eq!(Symbol::new("btcusdt").as_str(), "BTCUSDT");
        assert_eq!(Symbol::new(" EthUsdt ").as_str(), "ETHUSDT");
        assert_eq!(Symbol::new("AAPL").as_str(), "AAPL");
    }

    #[test]
    fn test_symbol_deserialize_normalizes() {
        let symbol: Symbol = serde_json::from_str("\"btcusdt\"").unwrap();
        assert_eq!(symbol.as_str(), "BTCUSDT");
    }

    #[test]
    fn test_symbol_display() {
        let symbol = Symbol::new("btcusdt");
        assert_eq!(symbol.to_string(), "BTCUSDT");
    }
}
