//! Currency codes and the per-currency decimal-place registry
//!
//! The registry is a process-wide immutable table embedded at compile
//! time. It maps ISO 4217 codes to the number of fractional digits a
//! settled amount may carry; the validator treats a lookup failure as
//! [`Error::UnsupportedCurrency`].

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// ISO 4217 currency code: three uppercase ASCII letters
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    /// Parse a code, rejecting anything but three uppercase ASCII letters
    pub fn from_code(code: &str) -> Result<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(Error::UnsupportedCurrency(code.to_string()));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2]]))
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        // Constructed only from validated ASCII
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.as_str())
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Currency::from_code(&code).map_err(de::Error::custom)
    }
}

/// Decimal places per ISO 4217 code, sorted by code for binary search.
///
/// Covers the corridors the hub settles plus the zero- and three-digit
/// currencies that exercise the precision rules.
const CURRENCY_DECIMALS: &[(&str, u32)] = &[
    ("AED", 2),
    ("AUD", 2),
    ("BHD", 3),
    ("BIF", 0),
    ("BRL", 2),
    ("CAD", 2),
    ("CHF", 2),
    ("CLP", 0),
    ("CNY", 2),
    ("COP", 2),
    ("CZK", 2),
    ("DJF", 0),
    ("DKK", 2),
    ("EGP", 2),
    ("ETB", 2),
    ("EUR", 2),
    ("GBP", 2),
    ("GHS", 2),
    ("GMD", 2),
    ("GNF", 0),
    ("HKD", 2),
    ("HUF", 2),
    ("IDR", 2),
    ("ILS", 2),
    ("INR", 2),
    ("IQD", 3),
    ("ISK", 0),
    ("JOD", 3),
    ("JPY", 0),
    ("KES", 2),
    ("KMF", 0),
    ("KRW", 0),
    ("KWD", 3),
    ("LRD", 2),
    ("LYD", 3),
    ("MAD", 2),
    ("MGA", 2),
    ("MRU", 2),
    ("MWK", 2),
    ("MXN", 2),
    ("MYR", 2),
    ("NGN", 2),
    ("NOK", 2),
    ("NZD", 2),
    ("OMR", 3),
    ("PHP", 2),
    ("PKR", 2),
    ("PLN", 2),
    ("PYG", 0),
    ("QAR", 2),
    ("RSD", 2),
    ("RUB", 2),
    ("RWF", 0),
    ("SAR", 2),
    ("SEK", 2),
    ("SGD", 2),
    ("SLE", 2),
    ("THB", 2),
    ("TND", 3),
    ("TRY", 2),
    ("TZS", 2),
    ("UGX", 0),
    ("USD", 2),
    ("VND", 0),
    ("XAF", 0),
    ("XOF", 0),
    ("ZAR", 2),
    ("ZMW", 2),
    ("ZWL", 2),
];

/// Look up a currency's decimal places in the registry
pub fn decimal_places(currency: Currency) -> Result<u32> {
    CURRENCY_DECIMALS
        .binary_search_by(|(code, _)| (*code).cmp(currency.as_str()))
        .map(|idx| CURRENCY_DECIMALS[idx].1)
        .map_err(|_| Error::UnsupportedCurrency(currency.as_str().to_string()))
}

/// Check that an amount carries no more fractional digits than `dp`
///
/// Uses banker's rounding, but only as an equality test: an amount
/// conforms exactly when rounding to `dp` digits changes nothing.
pub fn conforms_to_precision(amount: Decimal, dp: u32) -> bool {
    amount.round_dp(dp) == amount
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uppercase_codes_only() {
        assert!(Currency::from_code("USD").is_ok());
        assert!(Currency::from_code("usd").is_err());
        assert!(Currency::from_code("USDX").is_err());
        assert!(Currency::from_code("U$D").is_err());
        assert_eq!(Currency::from_code("XOF").unwrap().as_str(), "XOF");
    }

    #[test]
    fn registry_table_is_sorted() {
        for pair in CURRENCY_DECIMALS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} !< {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn registry_lookups() {
        assert_eq!(decimal_places(Currency::from_code("USD").unwrap()).unwrap(), 2);
        assert_eq!(decimal_places(Currency::from_code("JPY").unwrap()).unwrap(), 0);
        assert_eq!(decimal_places(Currency::from_code("KWD").unwrap()).unwrap(), 3);

        let unknown = Currency::from_code("ZZZ").unwrap();
        assert!(matches!(
            decimal_places(unknown),
            Err(Error::UnsupportedCurrency(code)) if code == "ZZZ"
        ));
    }

    #[test]
    fn precision_conformance() {
        let ok: Decimal = "10.25".parse().unwrap();
        let bad: Decimal = "0.001".parse().unwrap();
        assert!(conforms_to_precision(ok, 2));
        assert!(!conforms_to_precision(bad, 2));
        assert!(conforms_to_precision(bad, 3));
        assert!(conforms_to_precision(Decimal::ZERO, 0));
    }

    #[test]
    fn serde_round_trip() {
        let usd = Currency::from_code("USD").unwrap();
        let json = serde_json::to_string(&usd).unwrap();
        assert_eq!(json, "\"USD\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, usd);
        assert!(serde_json::from_str::<Currency>("\"usd\"").is_err());
    }
}
