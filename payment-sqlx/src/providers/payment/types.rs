use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// DB for TransactionStatus
pub(crate) const PENDING_STR: &str = "pending";
pub(crate) const CONFIRMED_STR: &str = "confirmed";
pub(crate) const COMPLETED_STR: &str = "completed";
pub(crate) const FAILED_STR: &str = "failed";
pub(crate) const CANCELLED_STR: &str = "cancelled";

/// DB for TransactionType
pub(crate) const DEPOSIT_STR: &str = "deposit";
pub(crate) const WITHDRAWAL_STR: &str = "withdrawal";
pub(crate) const CONVERSION_STR: &str = "conversion";
pub(crate) const PAYMENT_STR: &str = "payment";
pub(crate) const TRANSFER_STR: &str = "transfer";
pub(crate) const REFUND_STR: &str = "refund";

/// DB for UserRole
pub(crate) const USER_STR: &str = "user";
pub(crate) const MERCHANT_STR: &str = "merchant";
pub(crate) const ADMIN_STR: &str = "admin";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => PENDING_STR,
            TransactionStatus::Confirmed => CONFIRMED_STR,
            TransactionStatus::Completed => COMPLETED_STR,
            TransactionStatus::Failed => FAILED_STR,
            TransactionStatus::Cancelled => CANCELLED_STR,
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PENDING_STR => Ok(TransactionStatus::Pending),
            CONFIRMED_STR => Ok(TransactionStatus::Confirmed),
            COMPLETED_STR => Ok(TransactionStatus::Completed),
            FAILED_STR => Ok(TransactionStatus::Failed),
            CANCELLED_STR => Ok(TransactionStatus::Cancelled),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Conversion,
    Payment,
    Transfer,
    Refund,
}

impl TransactionType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => DEPOSIT_STR,
            TransactionType::Withdrawal => WITHDRAWAL_STR,
            TransactionType::Conversion => CONVERSION_STR,
            TransactionType::Payment => PAYMENT_STR,
            TransactionType::Transfer => TRANSFER_STR,
            TransactionType::Refund => REFUND_STR,
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DEPOSIT_STR => Ok(TransactionType::Deposit),
            WITHDRAWAL_STR => Ok(TransactionType::Withdrawal),
            CONVERSION_STR => Ok(TransactionType::Conversion),
            PAYMENT_STR => Ok(TransactionType::Payment),
            TRANSFER_STR => Ok(TransactionType::Transfer),
            REFUND_STR => Ok(TransactionType::Refund),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Merchant,
    Admin,
}

impl UserRole {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            UserRole::User => USER_STR,
            UserRole::Merchant => MERCHANT_STR,
            UserRole::Admin => ADMIN_STR,
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            USER_STR => Ok(UserRole::User),
            MERCHANT_STR => Ok(UserRole::Merchant),
            ADMIN_STR => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Stores the enum as its lowercase TEXT value.
macro_rules! impl_text_column {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.as_db_str())
            }
        }

        impl<DB> sqlx::Type<DB> for $ty
        where
            DB: sqlx::Database,
            String: sqlx::Type<DB>,
        {
            fn type_info() -> <DB as sqlx::Database>::TypeInfo {
                <String as sqlx::Type<DB>>::type_info()
            }

            fn compatible(ty: &<DB as sqlx::Database>::TypeInfo) -> bool {
                <String as sqlx::Type<DB>>::compatible(ty)
            }
        }

        impl<'r, DB> sqlx::Decode<'r, DB> for $ty
        where
            DB: sqlx::Database,
            &'r str: sqlx::Decode<'r, DB>,
        {
            fn decode(
                value: <DB as sqlx::Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s = <&str as sqlx::Decode<DB>>::decode(value)?;
                <$ty>::from_str(s).map_err(Into::into)
            }
        }

        impl<'q, DB> sqlx::Encode<'q, DB> for $ty
        where
            DB: sqlx::Database,
            &'q str: sqlx::Encode<'q, DB>,
        {
            fn encode_by_ref(
                &self,
                buf: &mut <DB as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<'q, DB>>::encode(self.as_db_str(), buf)
            }
        }
    };
}

impl_text_column!(TransactionStatus);
impl_text_column!(TransactionType);
impl_text_column!(UserRole);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    pub tx_hash: String,
    pub block_number: i64,
    pub wallet_timestamp: DateTime<Utc>,
    pub network: String,
    pub chain_id: i64,
    pub from_address: String,
    pub to_address: String,
    pub token_symbol: String,
    pub token_address: Option<String>,
    pub token_amount: BigDecimal,
    pub token_decimals: i32,
    pub fiat_currency: Option<String>,
    pub fiat_amount: Option<BigDecimal>,
    pub exchange_rate: Option<BigDecimal>,
    pub gas_used: BigDecimal,
    pub gas_price: BigDecimal,
    pub gas_fee: BigDecimal,
    pub status: TransactionStatus,
    pub tx_type: TransactionType,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row to insert for a first-seen transaction hash.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub tx_hash: String,
    pub block_number: i64,
    pub wallet_timestamp: DateTime<Utc>,
    pub network: String,
    pub chain_id: i64,
    pub from_address: String,
    pub to_address: String,
    pub token_symbol: String,
    pub token_address: Option<String>,
    pub token_amount: BigDecimal,
    pub token_decimals: i32,
    pub fiat_currency: Option<String>,
    pub fiat_amount: Option<BigDecimal>,
    pub exchange_rate: Option<BigDecimal>,
    pub gas_used: BigDecimal,
    pub gas_price: BigDecimal,
    pub gas_fee: BigDecimal,
    pub status: TransactionStatus,
    pub tx_type: TransactionType,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub wallet_address: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionFilter {
    pub address: Option<String>,
    pub status: Option<TransactionStatus>,
    pub tx_type: Option<TransactionType>,
    pub page: i64,
    pub items_per_page: i64,
}

impl TransactionFilter {
    /// Row offset of the requested page, `None` when it does not fit in an i64.
    pub fn offset(&self) -> Option<i64> {
        (self.page.max(1) - 1).checked_mul(self.items_per_page)
    }
}

/// Aggregates over the stored transactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_count: i64,
    pub total_token_amount: BigDecimal,
    pub total_gas_fee: BigDecimal,
    pub by_status: BTreeMap<String, i64>,
    pub by_type: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct SummaryRow {
    pub status: TransactionStatus,
    pub tx_type: TransactionType,
    pub count: i64,
    pub token_volume: BigDecimal,
    pub gas_fees: BigDecimal,
}

impl TransactionSummary {
    pub(crate) fn from_rows(rows: Vec<SummaryRow>) -> Self {
        rows.into_iter()
            .fold(TransactionSummary::default(), |mut summary, row| {
                summary.total_count += row.count;
                summary.total_token_amount += row.token_volume;
                summary.total_gas_fee += row.gas_fees;
                *summary
                    .by_status
                    .entry(row.status.to_string())
                    .or_insert(0) += row.count;
                *summary.by_type.entry(row.tx_type.to_string()).or_insert(0) += row.count;
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_db_strings_round_trip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Confirmed,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Cancelled,
        ] {
            assert_eq!(TransactionStatus::from_str(status.as_db_str()), Ok(status));
        }
        assert!(TransactionStatus::from_str("COMPLETED").is_err());
    }

    #[test]
    fn role_defaults_to_user() {
        assert_eq!(UserRole::default(), UserRole::User);
        assert_eq!(UserRole::from_str("admin"), Ok(UserRole::Admin));
    }

    #[test]
    fn filter_offset_starts_at_first_page() {
        let filter = TransactionFilter {
            page: 3,
            items_per_page: 20,
            ..Default::default()
        };
        assert_eq!(filter.offset(), Some(40));

        let filter = TransactionFilter {
            page: 0,
            items_per_page: 20,
            ..Default::default()
        };
        assert_eq!(filter.offset(), Some(0));

        let filter = TransactionFilter {
            page: i64::MAX,
            items_per_page: 100,
            ..Default::default()
        };
        assert_eq!(filter.offset(), None);
    }

    #[test]
    fn summary_folds_grouped_rows() {
        let rows = vec![
            SummaryRow {
                status: TransactionStatus::Completed,
                tx_type: TransactionType::Transfer,
                count: 2,
                token_volume: BigDecimal::from(3000),
                gas_fees: BigDecimal::from(42),
            },
            SummaryRow {
                status: TransactionStatus::Failed,
                tx_type: TransactionType::Transfer,
                count: 1,
                token_volume: BigDecimal::from(0),
                gas_fees: BigDecimal::from(8),
            },
        ];

        let summary = TransactionSummary::from_rows(rows);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.total_token_amount, BigDecimal::from(3000));
        assert_eq!(summary.total_gas_fee, BigDecimal::from(50));
        assert_eq!(summary.by_status.get("completed"), Some(&2));
        assert_eq!(summary.by_status.get("failed"), Some(&1));
        assert_eq!(summary.by_type.get("transfer"), Some(&3));
    }
}
