//! Conversion from roubles at fixed rates.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::CalcError;

/// One supported currency: roubles per unit and a display name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub rate: f64,
}

static RATES: LazyLock<BTreeMap<&'static str, Currency>> = LazyLock::new(|| {
    [
        ("USD", "US Dollar", 90.0),
        ("EUR", "Euro", 98.0),
        ("GBP", "British Pound", 114.0),
        ("CNY", "Chinese Yuan", 12.5),
        ("JPY", "Japanese Yen", 0.6),
    ]
    .into_iter()
    .map(|(code, name, rate)| (code, Currency { code, name, rate }))
    .collect()
});

pub fn currencies() -> impl Iterator<Item = &'static Currency> {
    RATES.values()
}

pub fn lookup(code: &str) -> Result<&'static Currency, CalcError> {
    RATES
        .get(code.to_ascii_uppercase().as_str())
        .ok_or_else(|| CalcError::UnknownCurrency(code.to_string()))
}

/// Convert `amount_rub` into `code`.
pub fn convert(amount_rub: f64, code: &str) -> Result<f64, CalcError> {
    Ok(amount_rub / lookup(code)?.rate)
}
