//! FX-provider adaptor
//!
//! Shapes generic FX-rate records into the partner bank's inner rate
//! block (the "pain-01" sub-document of its FX feed). Not part of the
//! settlement flow; it rides the rate-publication ingress path and owns
//! the string-shaped decimal-rate contracts that come with it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A registered FX channel between two currencies
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxpChannel {
    /// Currency sold
    pub source_currency: String,

    /// Currency bought
    pub destination_currency: String,
}

/// An FX-rate record as published to the hub
///
/// `rate` is an unscaled digit string; `decimal_rate` says how many of
/// its trailing digits are fractional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxpRate {
    /// Unscaled rate digits
    pub rate: String,

    /// Fractional digits within `rate`
    pub decimal_rate: u32,

    /// Rate validity end, ISO 8601
    pub end_time: String,

    /// Partner-bank rate-set id, when the publisher supplies one
    #[serde(default)]
    pub rate_set_id: Option<String>,
}

/// Partner-bank inner rate block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CitiRateBlock {
    /// Rate-set id
    pub rate_set_id: String,
    /// Six-letter currency pair
    pub currency_pair: String,
    /// First three letters of the pair
    pub base_currency: String,
    /// Fractional digits of the bid rate
    pub rate_precision: String,
    /// Inverse-rate precision (fixed)
    pub inv_rate_precision: String,
    /// Settlement tenor (fixed `TN`, settle on T+1)
    pub tenor: String,
    /// Value date placeholder (fixed)
    pub value_date: String,
    /// Bid rate with the decimal point inserted
    pub bid_spot_rate: String,
    /// Offer rate placeholder (fixed)
    pub offer_spot_rate: String,
    /// Mid price placeholder (fixed)
    pub mid_price: String,
    /// `end_time` with `T` replaced by a space and the trailing `Z` dropped
    pub valid_until_time: String,
    /// Validity flag (fixed)
    pub is_valid: String,
    /// Tradability flag (fixed)
    pub is_tradable: String,
}

/// Rate-set ids the partner bank assigned to the hub's corridors, used
/// when the published record carries none.
const RATE_SET_IDS: &[(&str, &str)] = &[
    ("EURUSD", "4"),
    ("EURXOF", "2"),
    ("USDEUR", "3"),
    ("USDXOF", "1"),
];

/// Insert a decimal point `decimal_places` positions from the right
///
/// `build_decimal_rate("123456", 4)` is `"12.3456"`; with
/// `decimal_places` at or beyond the string length the digits are kept
/// whole behind `"0."`; with zero they pass through unchanged.
pub fn build_decimal_rate(rate_digits: &str, decimal_places: u32) -> Result<String> {
    if rate_digits.is_empty() || !rate_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidInput {
            field: "rate",
            reason: format!("'{}' is not a digit string", rate_digits),
        });
    }

    let dp = decimal_places as usize;
    if dp == 0 {
        return Ok(rate_digits.to_string());
    }
    if dp >= rate_digits.len() {
        return Ok(format!("0.{}", rate_digits));
    }
    let split = rate_digits.len() - dp;
    Ok(format!("{}.{}", &rate_digits[..split], &rate_digits[split..]))
}

/// Currency sold over a six-letter pair
pub fn extract_source_currency(pair: &str) -> Result<String> {
    let normalised = normalise_pair(pair)?;
    Ok(normalised[..3].to_string())
}

/// Currency bought over a six-letter pair
pub fn extract_destination_currency(pair: &str) -> Result<String> {
    let normalised = normalise_pair(pair)?;
    Ok(normalised[3..].to_string())
}

/// Channel identifier: the two currencies concatenated, lowercased
pub fn build_custom_channel_identifier(channel: &FxpChannel) -> String {
    format!(
        "{}{}",
        channel.source_currency.to_lowercase(),
        channel.destination_currency.to_lowercase()
    )
}

/// Build the partner bank's inner rate block for a pair
///
/// `rate_set_id` comes from the published record when present, else the
/// static corridor table; a pair known to neither is rejected.
pub fn citi_rate_block(pair: &str, rate: &FxpRate) -> Result<CitiRateBlock> {
    let currency_pair = normalise_pair(pair)?;
    let base_currency = extract_source_currency(&currency_pair)?;
    let bid_spot_rate = build_decimal_rate(&rate.rate, rate.decimal_rate)?;

    let rate_set_id = match &rate.rate_set_id {
        Some(id) => id.clone(),
        None => RATE_SET_IDS
            .iter()
            .find(|(p, _)| *p == currency_pair)
            .map(|(_, id)| id.to_string())
            .ok_or_else(|| Error::InvalidInput {
                field: "rateSetId",
                reason: format!("no rate-set id registered for pair '{}'", currency_pair),
            })?,
    };

    let valid_until_time = rate
        .end_time
        .replace('T', " ")
        .trim_end_matches('Z')
        .to_string();

    Ok(CitiRateBlock {
        rate_set_id,
        currency_pair,
        base_currency,
        rate_precision: rate.decimal_rate.to_string(),
        inv_rate_precision: "1".to_string(),
        tenor: "TN".to_string(),
        value_date: "0000-00-00".to_string(),
        bid_spot_rate,
        offer_spot_rate: "0.0000".to_string(),
        mid_price: "0.0000".to_string(),
        valid_until_time,
        is_valid: "true".to_string(),
        is_tradable: "true".to_string(),
    })
}

fn normalise_pair(pair: &str) -> Result<String> {
    if pair.len() != 6 || !pair.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(Error::InvalidInput {
            field: "currencyPair",
            reason: format!("'{}' is not a six-letter currency pair", pair),
        });
    }
    Ok(pair.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(digits: &str, dp: u32, rate_set_id: Option<&str>) -> FxpRate {
        FxpRate {
            rate: digits.to_string(),
            decimal_rate: dp,
            end_time: "2026-08-02T17:00:00Z".to_string(),
            rate_set_id: rate_set_id.map(str::to_string),
        }
    }

    #[test]
    fn decimal_rate_splits_at_the_point() {
        assert_eq!(build_decimal_rate("123456", 4).unwrap(), "12.3456");
        assert_eq!(build_decimal_rate("123456", 7).unwrap(), "0.123456");
        assert_eq!(build_decimal_rate("123456", 6).unwrap(), "0.123456");
        assert_eq!(build_decimal_rate("123456", 0).unwrap(), "123456");
        assert_eq!(build_decimal_rate("5", 1).unwrap(), "0.5");
    }

    #[test]
    fn decimal_rate_rejects_non_digit_input() {
        assert!(matches!(
            build_decimal_rate("", 2),
            Err(Error::InvalidInput { field: "rate", .. })
        ));
        assert!(matches!(
            build_decimal_rate("12a4", 2),
            Err(Error::InvalidInput { field: "rate", .. })
        ));
        assert!(matches!(
            build_decimal_rate("-1234", 2),
            Err(Error::InvalidInput { field: "rate", .. })
        ));
    }

    #[test]
    fn channel_identifier_lowercases_both_legs() {
        let channel = FxpChannel {
            source_currency: "vaRiousCase".to_string(),
            destination_currency: "ALLCAPS".to_string(),
        };
        assert_eq!(build_custom_channel_identifier(&channel), "variouscaseallcaps");
    }

    #[test]
    fn pair_extraction() {
        assert_eq!(extract_source_currency("usdXOF").unwrap(), "USD");
        assert_eq!(extract_destination_currency("usdXOF").unwrap(), "XOF");
        assert!(extract_source_currency("USD").is_err());
        assert!(extract_source_currency("USD/XF").is_err());
    }

    #[test]
    fn rate_block_carries_the_partner_contract() {
        let block = citi_rate_block("usdxof", &rate("6055500", 4, None)).unwrap();
        assert_eq!(block.rate_set_id, "1");
        assert_eq!(block.currency_pair, "USDXOF");
        assert_eq!(block.base_currency, "USD");
        assert_eq!(block.rate_precision, "4");
        assert_eq!(block.inv_rate_precision, "1");
        assert_eq!(block.tenor, "TN");
        assert_eq!(block.value_date, "0000-00-00");
        assert_eq!(block.bid_spot_rate, "605.5500");
        assert_eq!(block.offer_spot_rate, "0.0000");
        assert_eq!(block.mid_price, "0.0000");
        assert_eq!(block.valid_until_time, "2026-08-02 17:00:00");
        assert_eq!(block.is_valid, "true");
        assert_eq!(block.is_tradable, "true");
    }

    #[test]
    fn rate_set_id_prefers_the_published_record() {
        let block = citi_rate_block("USDXOF", &rate("12", 0, Some("77"))).unwrap();
        assert_eq!(block.rate_set_id, "77");
    }

    #[test]
    fn unknown_pair_without_rate_set_id_is_rejected() {
        let result = citi_rate_block("GBPJPY", &rate("12", 0, None));
        assert!(matches!(
            result,
            Err(Error::InvalidInput { field: "rateSetId", .. })
        ));
    }

    #[test]
    fn rate_block_serialises_camel_case() {
        let block = citi_rate_block("USDXOF", &rate("6055500", 4, None)).unwrap();
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["rateSetId"], "1");
        assert_eq!(json["bidSpotRate"], "605.5500");
        assert_eq!(json["validUntilTime"], "2026-08-02 17:00:00");
        assert_eq!(json["isTradable"], "true");
    }
}
