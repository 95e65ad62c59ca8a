//! Side (Buy / Sell) for orders and fills.

/// Order side: Buy or Sell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Human-readable label used in notifications (`"Buy"` / `"Sell"`).
    pub fn label(self) -> &'static str {
        match self {
            Side::Buy => "Buy",
            Side::Sell => "Sell",
        }
    }

    /// Parse a protocol keyword (`BUY` / `SELL`, case-insensitive).
    pub fn from_keyword(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("BUY") {
            Some(Side::Buy)
        } else if s.eq_ignore_ascii_case("SELL") {
            Some(Side::Sell)
        } else {
            None
        }
    }
}
