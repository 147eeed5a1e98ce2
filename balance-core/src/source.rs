//! Balance source definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported balance sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// PayPay - Japanese mobile payment service
    PayPay,
    /// Polymarket - Crypto-based prediction market
    Polymarket,
}

impl Source {
    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::PayPay => "PayPay",
            Source::Polymarket => "Polymarket",
        }
    }

    /// Prefix used for the environment variables this source reads and exports
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Source::PayPay => "PAYPAY",
            Source::Polymarket => "POLYMARKET",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paypay" | "pp" => Ok(Source::PayPay),
            "polymarket" | "poly" | "p" => Ok(Source::Polymarket),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!("paypay".parse::<Source>().unwrap(), Source::PayPay);
        assert_eq!("Poly".parse::<Source>().unwrap(), Source::Polymarket);
        assert!("binance".parse::<Source>().is_err());
    }
}
