use crate::ids::{Symbol, Username};
use crate::models::{PortfolioMetrics, Transaction, TransactionType};
use crate::Money;

use serde::Serialize;

const NOT_APPLICABLE: &str = "n/a";

/// One dashboard row per account, money columns pre-formatted for display
#[derive(Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccountReport {
    pub username: String,
    pub cash_balance: String,
    pub holdings_value: String,
    pub total_value: String,
    pub net_deposits: String,
    pub profit_loss: String,
    pub profit_loss_pct: String,
}

impl AccountReport {
    pub fn new(username: &Username, metrics: &PortfolioMetrics) -> Self {
        let profit_loss_pct = match metrics.profit_loss.percent {
            Some(pct) => format!("{pct:.2}"),
            None => NOT_APPLICABLE.to_string(),
        };

        return Self {
            username: username.to_string(),
            cash_balance: metrics.cash_balance.to_string(),
            holdings_value: metrics.holdings_value.to_string(),
            total_value: metrics.total_value.to_string(),
            net_deposits: metrics.net_deposits.to_string(),
            profit_loss: metrics.profit_loss.amount.to_string(),
            profit_loss_pct,
        };
    }
}

/// One row of the holdings table
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HoldingReport {
    pub symbol: String,
    pub quantity: u32,
    pub price: String,
    pub market_value: String,
}

impl HoldingReport {
    pub fn new(symbol: &Symbol, quantity: u32, price: Money, market_value: Money) -> Self {
        return Self {
            symbol: symbol.to_string(),
            quantity,
            price: price.to_string(),
            market_value: market_value.to_string(),
        };
    }
}

/// One row of the transaction history view. Fields that do not apply to cash
/// transactions render as "n/a".
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryReport {
    pub timestamp: String,

    #[serde(rename = "type")]
    pub tx_type: String,

    pub symbol: String,
    pub quantity: String,
    pub price_per_unit: String,
    pub amount: String,
    pub balance_after: String,
}

impl HistoryReport {
    pub fn from_transaction(tx: &Transaction) -> Self {
        let (tx_type, symbol, quantity, price_per_unit) = match &tx.tx_type {
            TransactionType::Deposit => ("deposit", None, None, None),
            TransactionType::Withdraw => ("withdraw", None, None, None),
            TransactionType::Buy {
                symbol,
                quantity,
                price_per_unit,
            } => ("buy", Some(symbol), Some(*quantity), Some(*price_per_unit)),
            TransactionType::Sell {
                symbol,
                quantity,
                price_per_unit,
            } => ("sell", Some(symbol), Some(*quantity), Some(*price_per_unit)),
        };

        return Self {
            timestamp: tx.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            tx_type: tx_type.to_string(),
            symbol: symbol.map_or(NOT_APPLICABLE.to_string(), |s| s.to_string()),
            quantity: quantity.map_or(NOT_APPLICABLE.to_string(), |q| q.to_string()),
            price_per_unit: price_per_unit.map_or(NOT_APPLICABLE.to_string(), |p| p.to_string()),
            amount: tx.amount.to_string(),
            balance_after: tx.balance_after.to_string(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    #[test]
    fn history_rows_mark_inapplicable_fields() {
        let deposit = Transaction {
            timestamp: Utc::now(),
            tx_type: TransactionType::Deposit,
            amount: Money(10_000_000),
            balance_after: Money(10_000_000),
        };

        let row = HistoryReport::from_transaction(&deposit);

        assert_eq!(row.tx_type, "deposit");
        assert_eq!(row.symbol, NOT_APPLICABLE);
        assert_eq!(row.quantity, NOT_APPLICABLE);
        assert_eq!(row.price_per_unit, NOT_APPLICABLE);
        assert_eq!(row.amount, "1000");

        let buy = Transaction {
            timestamp: Utc::now(),
            tx_type: TransactionType::Buy {
                symbol: Symbol::new("AAPL"),
                quantity: 5,
                price_per_unit: Money(1_500_000),
            },
            amount: Money(-7_500_000),
            balance_after: Money(2_500_000),
        };

        let row = HistoryReport::from_transaction(&buy);

        assert_eq!(row.tx_type, "buy");
        assert_eq!(row.symbol, "AAPL");
        assert_eq!(row.quantity, "5");
        assert_eq!(row.price_per_unit, "150");
        assert_eq!(row.amount, "-750");
        assert_eq!(row.balance_after, "250");
    }
}
