use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Paid,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Paid => "PAID",
        })
    }
}

/// Cash-flow entry. Booking saves append these automatically: an income entry
/// per payment received, and payout expenses once a booking completes fully
/// paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub amount: BigDecimal,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub booking_id: Option<Uuid>,
    /// Counterparty: vendor, partner or driver the entry settles with.
    pub related_id: Option<Uuid>,
    pub status: TransactionStatus,
}
