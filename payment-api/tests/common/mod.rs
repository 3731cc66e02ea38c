#![allow(dead_code)]

use bigdecimal::BigDecimal;
use chrono::{TimeZone, Utc};
use payment_sqlx::{
    NewTransaction, TransactionRecord, TransactionStatus, TransactionType, UserRecord, UserRole,
};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

pub const SECRET: &str = "whsec_integration_secret";
pub const TX_HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";
pub const FROM_ADDRESS: &str = "0xa1b2c3d4e5f60718293a4b5c6d7e8f9012345678";
pub const TO_ADDRESS: &str = "0x1111111111111111111111111111111111111111";

/// Builds the provider envelope with one activity entry.
pub fn envelope_body(value: &str, status: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "type": "ADDRESS_ACTIVITY",
        "webhookId": "wh_octjglnywaupz6th",
        "id": "whevt_ogrc5v64myey69ux",
        "createdAt": "2024-10-17T09:15:00.000Z",
        "event": {
            "network": "ETH_MAINNET",
            "activity": [{
                "hash": TX_HASH,
                "blockNum": "0xdf34a3",
                "fromAddress": "0xA1B2c3D4e5F60718293a4B5c6D7e8F9012345678",
                "toAddress": TO_ADDRESS,
                "value": value,
                "gasUsed": "21000",
                "gasPrice": "30000000000",
                "status": status,
                "chainId": "0x1",
                "timestamp": "0x6710d5c4",
                "asset": "ETH"
            }]
        }
    }))
    .unwrap()
}

pub fn user_record(address: &str, role: UserRole) -> UserRecord {
    UserRecord {
        id: Uuid::new_v4(),
        wallet_address: address.to_string(),
        role,
        created_at: Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap(),
    }
}

/// What the store would return after inserting `tx`.
pub fn record_from(tx: &NewTransaction) -> TransactionRecord {
    let now = Utc::now();
    TransactionRecord {
        id: Uuid::new_v4(),
        tx_hash: tx.tx_hash.clone(),
        block_number: tx.block_number,
        wallet_timestamp: tx.wallet_timestamp,
        network: tx.network.clone(),
        chain_id: tx.chain_id,
        from_address: tx.from_address.clone(),
        to_address: tx.to_address.clone(),
        token_symbol: tx.token_symbol.clone(),
        token_address: tx.token_address.clone(),
        token_amount: tx.token_amount.clone(),
        token_decimals: tx.token_decimals,
        fiat_currency: tx.fiat_currency.clone(),
        fiat_amount: tx.fiat_amount.clone(),
        exchange_rate: tx.exchange_rate.clone(),
        gas_used: tx.gas_used.clone(),
        gas_price: tx.gas_price.clone(),
        gas_fee: tx.gas_fee.clone(),
        status: tx.status,
        tx_type: tx.tx_type,
        user_id: tx.user_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn stored_record(status: TransactionStatus, tx_type: TransactionType) -> TransactionRecord {
    record_from(&NewTransaction {
        tx_hash: TX_HASH.to_string(),
        block_number: 14_628_003,
        wallet_timestamp: Utc.with_ymd_and_hms(2024, 10, 17, 9, 15, 0).unwrap(),
        network: "ETH_MAINNET".to_string(),
        chain_id: 1,
        from_address: FROM_ADDRESS.to_string(),
        to_address: TO_ADDRESS.to_string(),
        token_symbol: "ETH".to_string(),
        token_address: None,
        token_amount: BigDecimal::from_str("1000000000000000000").unwrap(),
        token_decimals: 18,
        fiat_currency: None,
        fiat_amount: None,
        exchange_rate: None,
        gas_used: BigDecimal::from(21000),
        gas_price: BigDecimal::from_str("30000000000").unwrap(),
        gas_fee: BigDecimal::from_str("630000000000000").unwrap(),
        status,
        tx_type,
        user_id: Uuid::new_v4(),
    })
}
