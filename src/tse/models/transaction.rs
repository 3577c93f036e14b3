use crate::ids::Symbol;
use crate::Money;

use chrono::{DateTime, Utc};

/// Immutable record of one completed ledger-affecting operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub timestamp: DateTime<Utc>,

    pub tx_type: TransactionType,

    /// Signed total effect on cash: positive for Deposit/Sell, negative for Withdraw/Buy
    pub amount: Money,

    /// Cash balance immediately after this transaction
    pub balance_after: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Buy {
        symbol: Symbol,
        quantity: u32,
        /// Oracle quote captured at execution time, never recomputed later
        price_per_unit: Money,
    },
    Sell {
        symbol: Symbol,
        quantity: u32,
        price_per_unit: Money,
    },
}
