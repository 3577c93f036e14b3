use super::{Account, Transaction, TransactionType};

use crate::ids::Symbol;
use crate::Money;
use crate::Result;

use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Replayed balance went negative at transaction {index}: {balance}")]
    NegativeBalance { index: usize, balance: Money },

    #[error("Balance mismatch at transaction {index}: log says {recorded}, replay says {replayed}")]
    BalanceMismatch {
        index: usize,
        recorded: Money,
        replayed: Money,
    },

    #[error("Amount mismatch at transaction {index}: log says {recorded}, quantity times price says {expected}")]
    AmountMismatch {
        index: usize,
        recorded: Money,
        expected: Money,
    },

    #[error("Replay sold {requested} of {symbol} at transaction {index} with only {owned} held")]
    Oversold {
        index: usize,
        symbol: Symbol,
        requested: u32,
        owned: u32,
    },

    #[error("Holding size overflow for {symbol} at transaction {index}")]
    HoldingOverflow { index: usize, symbol: Symbol },

    #[error("Timestamps run backwards at transaction {index}")]
    TimestampOrder { index: usize },
}

/// Account state derived entirely from a transaction log. Rebuilding the
/// snapshot from the log and comparing it against the live account is the
/// ledger's audit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub cash_balance: Money,
    pub net_deposits: Money,
    pub holdings: HashMap<Symbol, u32>,
}

impl Snapshot {
    pub fn new() -> Self {
        return Self {
            cash_balance: Money::ZERO,
            net_deposits: Money::ZERO,
            holdings: HashMap::new(),
        };
    }

    /// Current account state, with zero-quantity holdings normalized away
    pub fn of(account: &Account) -> Self {
        let holdings = account
            .holdings
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(symbol, quantity)| (symbol.clone(), *quantity))
            .collect();

        return Self {
            cash_balance: account.cash_balance,
            net_deposits: account.net_deposits,
            holdings,
        };
    }

    /// Replays a transaction log in order from a zero balance, cross-checking
    /// the audit fields as it goes
    pub fn rebuild(transactions: &[Transaction]) -> Result<Self> {
        let mut snapshot = Self::new();
        let mut prev_timestamp = None;

        for (index, tx) in transactions.iter().enumerate() {
            if let Some(prev) = prev_timestamp {
                if tx.timestamp < prev {
                    Err(SnapshotError::TimestampOrder { index })?
                }
            }
            prev_timestamp = Some(tx.timestamp);

            match &tx.tx_type {
                TransactionType::Deposit | TransactionType::Withdraw => {
                    // Withdraw amounts are negative, so both fold the same way
                    snapshot.net_deposits.add(&tx.amount)?;
                }

                TransactionType::Buy {
                    symbol,
                    quantity,
                    price_per_unit,
                } => {
                    let mut expected = Money::ZERO;
                    expected.sub(&price_per_unit.times(*quantity)?)?;

                    if tx.amount != expected {
                        Err(SnapshotError::AmountMismatch {
                            index,
                            recorded: tx.amount,
                            expected,
                        })?
                    }

                    let owned = snapshot.holdings.get(symbol).copied().unwrap_or(0);
                    let owned = owned.checked_add(*quantity).ok_or_else(|| {
                        SnapshotError::HoldingOverflow {
                            index,
                            symbol: symbol.clone(),
                        }
                    })?;

                    snapshot.holdings.insert(symbol.clone(), owned);
                }

                TransactionType::Sell {
                    symbol,
                    quantity,
                    price_per_unit,
                } => {
                    let owned = snapshot.holdings.get(symbol).copied().unwrap_or(0);

                    if owned < *quantity {
                        Err(SnapshotError::Oversold {
                            index,
                            symbol: symbol.clone(),
                            requested: *quantity,
                            owned,
                        })?
                    }

                    let expected = price_per_unit.times(*quantity)?;

                    if tx.amount != expected {
                        Err(SnapshotError::AmountMismatch {
                            index,
                            recorded: tx.amount,
                            expected,
                        })?
                    }

                    if owned == *quantity {
                        snapshot.holdings.remove(symbol);
                    } else {
                        snapshot.holdings.insert(symbol.clone(), owned - quantity);
                    }
                }
            }

            snapshot.cash_balance.add(&tx.amount)?;

            if snapshot.cash_balance.is_negative() {
                Err(SnapshotError::NegativeBalance {
                    index,
                    balance: snapshot.cash_balance,
                })?
            }

            if snapshot.cash_balance != tx.balance_after {
                Err(SnapshotError::BalanceMismatch {
                    index,
                    recorded: tx.balance_after,
                    replayed: snapshot.cash_balance,
                })?
            }
        }

        return Ok(snapshot);
    }
}
