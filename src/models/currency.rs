use serde::Serialize;

/// An entry of the fixed currency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    /// en-US display symbol
    pub symbol: &'static str,
    /// ISO 4217 minor unit digits
    pub minor_units: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrencyPreview {
    pub code: String,
    pub supported: bool,
    pub symbol: String,
    pub example: String,
}
