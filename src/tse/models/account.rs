use super::Transaction;

use crate::ids::{Symbol, Username};
use crate::Money;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A single user's cash, holdings, and append-only transaction log
#[derive(Debug)]
pub struct Account {
    pub username: Username,
    pub cash_balance: Money,
    pub net_deposits: Money,
    pub holdings: HashMap<Symbol, u32>,
    pub transactions: Vec<Transaction>,
}

impl Account {
    pub fn new(username: Username) -> Self {
        return Self {
            username,
            cash_balance: Money::ZERO,
            net_deposits: Money::ZERO,
            holdings: HashMap::new(),
            transactions: Vec::new(),
        };
    }

    /// An absent entry and a present-with-zero entry both count as "not owned"
    pub fn quantity_owned(&self, symbol: &Symbol) -> u32 {
        return self.holdings.get(symbol).copied().unwrap_or(0);
    }

    /// Timestamps never run backwards within one account's log, even if the
    /// wall clock does
    pub fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();

        match self.transactions.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }

    pub fn record(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::TransactionType;

    use chrono::Duration;

    #[test]
    fn quantity_owned_treats_zero_entry_as_not_owned() {
        let mut account = Account::new(Username::new("trader1"));

        assert_eq!(account.quantity_owned(&Symbol::new("AAPL")), 0);

        account.holdings.insert(Symbol::new("AAPL"), 0);
        assert_eq!(account.quantity_owned(&Symbol::new("AAPL")), 0);

        account.holdings.insert(Symbol::new("AAPL"), 5);
        assert_eq!(account.quantity_owned(&Symbol::new("AAPL")), 5);
    }

    #[test]
    fn next_timestamp_never_precedes_last_transaction() {
        let mut account = Account::new(Username::new("trader1"));

        let future = Utc::now() + Duration::hours(1);
        account.record(Transaction {
            timestamp: future,
            tx_type: TransactionType::Deposit,
            amount: Money(10_000),
            balance_after: Money(10_000),
        });

        assert_eq!(account.next_timestamp(), future);
    }
}
