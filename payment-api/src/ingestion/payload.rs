//! Strict schema for the provider's address-activity envelope and its
//! extraction into a [`CanonicalTransaction`].

use chrono::{DateTime, TimeZone, Utc};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::Deserialize;
use thiserror::Error;

use crate::utils::http_utils::{is_hex_string, normalize_address, parse_quantity};

const DEFAULT_NETWORK: &str = "ETH_MAINNET";
const DEFAULT_TOKEN_SYMBOL: &str = "ETH";
const DEFAULT_TOKEN_DECIMALS: u32 = 18;
const MAX_TOKEN_DECIMALS: u32 = 255;
/// Quantities are EVM words: at most 2^256 - 1.
const MAX_QUANTITY_BITS: u64 = 256;

/// The "no data" result of parsing: the delivery is a client error.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Envelope has no activity entry")]
    NoActivity,
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Cannot resolve chain id for network {0}")]
    UnknownChain(String),
}

impl PayloadError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PayloadError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub webhook_id: Option<String>,
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub event: WebhookEvent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub network: Option<String>,
    #[serde(default)]
    pub activity: Vec<ActivityEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub hash: String,
    pub block_num: Quantity,
    pub from_address: String,
    pub to_address: String,
    pub value: Quantity,
    pub gas_used: Option<Quantity>,
    pub gas_price: Option<Quantity>,
    pub status: Option<String>,
    pub chain_id: Option<Quantity>,
    pub timestamp: Option<Quantity>,
    pub asset: Option<String>,
    pub input: Option<String>,
    pub raw_contract: Option<RawContract>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContract {
    pub address: Option<String>,
    pub decimals: Option<Quantity>,
    pub raw_value: Option<String>,
}

/// A numeric field sent either as a string (hex or decimal) or as a JSON
/// unsigned integer. Floats match neither variant and are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Text(String),
    Integer(u64),
}

impl Quantity {
    pub fn to_biguint(&self) -> Result<BigUint, String> {
        match self {
            Quantity::Text(s) => parse_quantity(s),
            Quantity::Integer(n) => Ok(BigUint::from(*n)),
        }
    }
}

/// Success flag reported by the provider for the execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Failure,
    Unknown,
}

impl ExecutionOutcome {
    fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(|f| f.trim().to_lowercase()).as_deref() {
            Some("0x1") | Some("1") | Some("success") => ExecutionOutcome::Success,
            Some("0x0") | Some("0") | Some("failed") | Some("failure") => {
                ExecutionOutcome::Failure
            }
            _ => ExecutionOutcome::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenDescriptor {
    pub symbol: String,
    pub address: Option<String>,
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTransaction {
    pub tx_hash: String,
    pub block_number: i64,
    pub wallet_timestamp: Option<DateTime<Utc>>,
    pub network: String,
    pub chain_id: i64,
    pub from_address: String,
    pub to_address: String,
    pub value: BigUint,
    pub gas_used: BigUint,
    pub gas_price: BigUint,
    pub outcome: ExecutionOutcome,
    pub token: TokenDescriptor,
    pub has_call_data: bool,
}

/// Parses the raw webhook body and extracts the first activity entry.
pub fn parse_envelope(body: &[u8]) -> Result<CanonicalTransaction, PayloadError> {
    let envelope: WebhookEnvelope = serde_json::from_slice(body)?;
    extract_transaction(envelope)
}

pub fn extract_transaction(envelope: WebhookEnvelope) -> Result<CanonicalTransaction, PayloadError> {
    let created_at = envelope.created_at;
    let network = envelope
        .event
        .network
        .unwrap_or_else(|| DEFAULT_NETWORK.to_string());
    let entry = envelope
        .event
        .activity
        .into_iter()
        .next()
        .ok_or(PayloadError::NoActivity)?;

    if !is_hex_string(&entry.hash) {
        return Err(PayloadError::invalid("hash", entry.hash));
    }
    let from_address = checked_address("fromAddress", &entry.from_address)?;
    let to_address = checked_address("toAddress", &entry.to_address)?;

    let block_number = to_i64("blockNum", quantity("blockNum", &entry.block_num)?)?;
    let chain_id = match &entry.chain_id {
        Some(chain_id) => to_i64("chainId", quantity("chainId", chain_id)?)?,
        None => chain_id_for_network(&network)
            .ok_or_else(|| PayloadError::UnknownChain(network.clone()))?,
    };

    let value = quantity("value", &entry.value)?;
    let gas_used = optional_quantity("gasUsed", entry.gas_used.as_ref())?;
    let gas_price = optional_quantity("gasPrice", entry.gas_price.as_ref())?;

    let wallet_timestamp = match &entry.timestamp {
        Some(timestamp) => Some(parse_timestamp(timestamp)?),
        None => created_at,
    };

    let (token_address, decimals) = match &entry.raw_contract {
        Some(raw_contract) => (
            raw_contract
                .address
                .as_deref()
                .filter(|a| !a.is_empty())
                .map(|a| checked_address("rawContract.address", a))
                .transpose()?,
            match &raw_contract.decimals {
                Some(decimals) => to_decimals(quantity("rawContract.decimals", decimals)?)?,
                None => DEFAULT_TOKEN_DECIMALS,
            },
        ),
        None => (None, DEFAULT_TOKEN_DECIMALS),
    };

    let has_call_data = entry
        .input
        .as_deref()
        .map(|input| input.len() > 2 && input != "0x")
        .unwrap_or(false);

    Ok(CanonicalTransaction {
        tx_hash: normalize_address(&entry.hash),
        block_number,
        wallet_timestamp,
        network,
        chain_id,
        from_address,
        to_address,
        value,
        gas_used,
        gas_price,
        outcome: ExecutionOutcome::from_flag(entry.status.as_deref()),
        token: TokenDescriptor {
            symbol: entry
                .asset
                .filter(|asset| !asset.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string()),
            address: token_address,
            decimals,
        },
        has_call_data,
    })
}

/// Chain id for the provider network names, used when the entry omits `chainId`.
pub fn chain_id_for_network(network: &str) -> Option<i64> {
    match network {
        "ETH_MAINNET" => Some(1),
        "ETH_SEPOLIA" => Some(11_155_111),
        "ETH_HOLESKY" => Some(17_000),
        "MATIC_MAINNET" => Some(137),
        "MATIC_AMOY" => Some(80_002),
        "ARB_MAINNET" => Some(42_161),
        "ARB_SEPOLIA" => Some(421_614),
        "OPT_MAINNET" => Some(10),
        "OPT_SEPOLIA" => Some(11_155_420),
        "BASE_MAINNET" => Some(8_453),
        "BASE_SEPOLIA" => Some(84_532),
        _ => None,
    }
}

fn checked_address(field: &'static str, address: &str) -> Result<String, PayloadError> {
    if is_hex_string(address) {
        Ok(normalize_address(address))
    } else {
        Err(PayloadError::invalid(field, address))
    }
}

fn quantity(field: &'static str, value: &Quantity) -> Result<BigUint, PayloadError> {
    let parsed = value
        .to_biguint()
        .map_err(|reason| PayloadError::invalid(field, reason))?;
    if parsed.bits() > MAX_QUANTITY_BITS {
        return Err(PayloadError::invalid(field, "exceeds 256 bits"));
    }
    Ok(parsed)
}

fn optional_quantity(field: &'static str, value: Option<&Quantity>) -> Result<BigUint, PayloadError> {
    value
        .map(|v| quantity(field, v))
        .transpose()
        .map(Option::unwrap_or_default)
}

fn to_i64(field: &'static str, value: BigUint) -> Result<i64, PayloadError> {
    value
        .to_i64()
        .ok_or_else(|| PayloadError::invalid(field, format!("{} is out of range", value)))
}

fn to_decimals(value: BigUint) -> Result<u32, PayloadError> {
    value
        .to_u32()
        .filter(|d| *d <= MAX_TOKEN_DECIMALS)
        .ok_or_else(|| PayloadError::invalid("rawContract.decimals", value.to_string()))
}

/// Accepts RFC 3339 strings or unix seconds (hex or decimal).
fn parse_timestamp(value: &Quantity) -> Result<DateTime<Utc>, PayloadError> {
    if let Quantity::Text(text) = value {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    let seconds = to_i64("timestamp", quantity("timestamp", value)?)?;
    Utc.timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| PayloadError::invalid("timestamp", seconds.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn activity() -> serde_json::Value {
        json!({
            "hash": "0xABCDEF0123456789abcdef0123456789abcdef0123456789abcdef0123456789",
            "blockNum": "0x12a05f2",
            "fromAddress": "0xA1B2c3D4e5F60718293a4B5c6D7e8F9012345678",
            "toAddress": "0x1111111111111111111111111111111111111111",
            "value": "1000000000000000000",
            "gasUsed": "21000",
            "gasPrice": "30000000000",
            "status": "0x1",
            "chainId": "0x1",
            "timestamp": "0x6553f100"
        })
    }

    fn envelope(activity: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "type": "ADDRESS_ACTIVITY",
            "webhookId": "wh_123",
            "event": { "network": "ETH_MAINNET", "activity": [activity] }
        }))
        .unwrap()
    }

    #[test]
    fn extracts_canonical_transaction() {
        let tx = parse_envelope(&envelope(activity())).unwrap();

        assert_eq!(
            tx.tx_hash,
            "0xabcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789"
        );
        assert_eq!(tx.block_number, 0x12a05f2);
        assert_eq!(tx.chain_id, 1);
        assert_eq!(tx.network, "ETH_MAINNET");
        assert_eq!(tx.from_address, "0xa1b2c3d4e5f60718293a4b5c6d7e8f9012345678");
        assert_eq!(
            tx.value,
            BigUint::from_str("1000000000000000000").unwrap()
        );
        assert_eq!(tx.gas_used, BigUint::from(21000u32));
        assert_eq!(tx.gas_price, BigUint::from(30_000_000_000u64));
        assert_eq!(tx.outcome, ExecutionOutcome::Success);
        assert_eq!(tx.wallet_timestamp.unwrap().timestamp(), 0x6553f100);
        assert_eq!(tx.token.symbol, "ETH");
        assert_eq!(tx.token.decimals, 18);
        assert!(!tx.has_call_data);
    }

    #[test]
    fn missing_activity_is_no_data() {
        let body = br#"{"type":"ADDRESS_ACTIVITY","event":{"network":"ETH_MAINNET","activity":[]}}"#;
        assert!(matches!(parse_envelope(body), Err(PayloadError::NoActivity)));

        let body = br#"{"type":"ADDRESS_ACTIVITY","event":{}}"#;
        assert!(matches!(parse_envelope(body), Err(PayloadError::NoActivity)));
    }

    #[test]
    fn shape_mismatch_is_malformed() {
        assert!(matches!(
            parse_envelope(b"not json"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            parse_envelope(br#"{"type":"ADDRESS_ACTIVITY"}"#),
            Err(PayloadError::Malformed(_))
        ));

        let mut entry = activity();
        entry["value"] = json!(1.5);
        assert!(matches!(
            parse_envelope(&envelope(entry)),
            Err(PayloadError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_invalid_fields() {
        let mut entry = activity();
        entry["blockNum"] = json!("0xnothex");
        assert!(matches!(
            parse_envelope(&envelope(entry)),
            Err(PayloadError::InvalidField { field: "blockNum", .. })
        ));

        let mut entry = activity();
        entry["fromAddress"] = json!("alice");
        assert!(matches!(
            parse_envelope(&envelope(entry)),
            Err(PayloadError::InvalidField { field: "fromAddress", .. })
        ));
    }

    #[test]
    fn keeps_large_values_exact() {
        let mut entry = activity();
        entry["value"] = json!("0xffffffffffffffffffffffffffffffffffff");
        let tx = parse_envelope(&envelope(entry)).unwrap();
        assert_eq!(
            tx.value,
            BigUint::from_str("22300745198530623141535718272648361505980415").unwrap()
        );
    }

    #[test]
    fn rejects_quantities_wider_than_a_word() {
        let max_word = format!("0x{}", "f".repeat(64));
        let mut entry = activity();
        entry["gasUsed"] = json!(max_word);
        entry["gasPrice"] = json!(max_word);
        let tx = parse_envelope(&envelope(entry)).unwrap();
        assert_eq!(tx.gas_used.bits(), 256);

        let mut entry = activity();
        entry["value"] = json!(format!("0x1{}", "0".repeat(64)));
        assert!(matches!(
            parse_envelope(&envelope(entry)),
            Err(PayloadError::InvalidField { field: "value", .. })
        ));

        let mut entry = activity();
        entry["gasPrice"] = json!("1".repeat(80));
        assert!(matches!(
            parse_envelope(&envelope(entry)),
            Err(PayloadError::InvalidField { field: "gasPrice", .. })
        ));
    }

    #[test]
    fn json_integer_above_u64_is_malformed() {
        let body = String::from_utf8(envelope(activity()))
            .unwrap()
            .replace(r#""value":"1000000000000000000""#, r#""value":18446744073709551616"#);
        assert!(body.contains("18446744073709551616"));
        assert!(matches!(
            parse_envelope(body.as_bytes()),
            Err(PayloadError::Malformed(_))
        ));
    }

    #[test]
    fn accepts_integer_quantities_and_failure_flag() {
        let mut entry = activity();
        entry["value"] = json!(0);
        entry["blockNum"] = json!(100);
        entry["status"] = json!("0x0");
        let tx = parse_envelope(&envelope(entry)).unwrap();

        assert_eq!(tx.value, BigUint::default());
        assert_eq!(tx.block_number, 100);
        assert_eq!(tx.outcome, ExecutionOutcome::Failure);
    }

    #[test]
    fn resolves_chain_from_network_when_missing() {
        let mut entry = activity();
        entry.as_object_mut().unwrap().remove("chainId");
        let body = serde_json::to_vec(&json!({
            "type": "ADDRESS_ACTIVITY",
            "event": { "network": "MATIC_MAINNET", "activity": [entry.clone()] }
        }))
        .unwrap();
        assert_eq!(parse_envelope(&body).unwrap().chain_id, 137);

        let body = serde_json::to_vec(&json!({
            "type": "ADDRESS_ACTIVITY",
            "event": { "network": "UNKNOWN_NET", "activity": [entry] }
        }))
        .unwrap();
        assert!(matches!(
            parse_envelope(&body),
            Err(PayloadError::UnknownChain(_))
        ));
    }

    #[test]
    fn reads_token_contract_and_call_data() {
        let mut entry = activity();
        entry["asset"] = json!("USDC");
        entry["input"] = json!("0xa9059cbb");
        entry["rawContract"] = json!({
            "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
            "decimals": "0x6"
        });
        let tx = parse_envelope(&envelope(entry)).unwrap();

        assert_eq!(tx.token.symbol, "USDC");
        assert_eq!(
            tx.token.address.as_deref(),
            Some("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
        );
        assert_eq!(tx.token.decimals, 6);
        assert!(tx.has_call_data);
    }

    #[test]
    fn unknown_status_flag_and_missing_gas_default() {
        let mut entry = activity();
        let fields = entry.as_object_mut().unwrap();
        fields.remove("status");
        fields.remove("gasUsed");
        fields.remove("gasPrice");
        fields.remove("timestamp");
        let tx = parse_envelope(&envelope(entry)).unwrap();

        assert_eq!(tx.outcome, ExecutionOutcome::Unknown);
        assert_eq!(tx.gas_used, BigUint::default());
        assert_eq!(tx.gas_price, BigUint::default());
        assert!(tx.wallet_timestamp.is_none());
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let mut entry = activity();
        entry["timestamp"] = json!("2024-10-17T12:00:00Z");
        let tx = parse_envelope(&envelope(entry)).unwrap();
        assert_eq!(
            tx.wallet_timestamp.unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 17, 12, 0, 0).unwrap()
        );
    }
}
