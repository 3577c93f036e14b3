use super::{AccountService, AccountServiceError};

use crate::account_report::{AccountReport, HistoryReport, HoldingReport};
use crate::ids::{Symbol, Username};
use crate::models::{Account, PortfolioMetrics, ProfitLoss, Transaction, TransactionType};
use crate::oracle::PriceOracle;
use crate::Money;
use crate::Result;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradingServiceError {
    #[error("Quantity must be a positive number of shares: {0}")]
    InvalidQuantity(u32),

    #[error("Insufficient funds: cost {cost}, available {available}")]
    InsufficientFunds { cost: Money, available: Money },

    #[error("No shares of {0} held")]
    NotOwned(Symbol),

    #[error("Insufficient shares of {symbol}: requested {requested}, owned {owned}")]
    InsufficientShares {
        symbol: Symbol,
        owned: u32,
        requested: u32,
    },

    #[error("Holding size overflow for {symbol}: owned {owned}, buying {requested}")]
    HoldingOverflow {
        symbol: Symbol,
        owned: u32,
        requested: u32,
    },
}

/// The engine's front door: composes the account registry with a price oracle
/// and adds share trades and derived portfolio views on top of the cash ledger.
pub struct TradingService<O: PriceOracle> {
    account_service: AccountService,
    oracle: O,
}

impl<O: PriceOracle> TradingService<O> {
    pub fn new(account_service: AccountService, oracle: O) -> Self {
        return Self {
            account_service,
            oracle,
        };
    }

    pub fn take(self) -> AccountService {
        log::debug!("Destructuring TradingService");
        return self.account_service;
    }

    pub fn create_account(&mut self, username: Username, initial_deposit: Money) -> Result {
        self.account_service
            .create_account(username, initial_deposit)?;

        return Ok(());
    }

    pub fn deposit(&mut self, username: &Username, amount: Money) -> Result<Money> {
        return self.account_service.deposit(username, amount);
    }

    pub fn withdraw(&mut self, username: &Username, amount: Money) -> Result<Money> {
        return self.account_service.withdraw(username, amount);
    }

    /// Buys shares at the oracle's current quote, captured once for both the
    /// affordability check and the logged price. Returns the new balance and
    /// the new holding quantity.
    pub fn buy(&mut self, username: &Username, symbol: &Symbol, quantity: u32) -> Result<(Money, u32)> {
        if quantity == 0 {
            Err(TradingServiceError::InvalidQuantity(quantity))?
        }

        let price_per_unit = self.oracle.price(symbol)?;
        let cost = price_per_unit.times(quantity)?;

        let account = self
            .account_service
            .find_mut(username)
            .ok_or_else(|| AccountServiceError::AccountNotFound(username.clone()))?;

        if cost > account.cash_balance {
            Err(TradingServiceError::InsufficientFunds {
                cost,
                available: account.cash_balance,
            })?
        }

        let current = account.quantity_owned(symbol);
        let owned = current
            .checked_add(quantity)
            .ok_or_else(|| TradingServiceError::HoldingOverflow {
                symbol: symbol.clone(),
                owned: current,
                requested: quantity,
            })?;

        let timestamp = account.next_timestamp();

        let mut cash_balance = account.cash_balance;
        let mut tx_amount = Money::ZERO;
        cash_balance.sub(&cost)?;
        tx_amount.sub(&cost)?;

        // Commit only once every step has succeeded
        account.cash_balance = cash_balance;
        account.holdings.insert(symbol.clone(), owned);
        account.record(Transaction {
            timestamp,
            tx_type: TransactionType::Buy {
                symbol: symbol.clone(),
                quantity,
                price_per_unit,
            },
            amount: tx_amount,
            balance_after: cash_balance,
        });

        log::debug!(
            "Bought {quantity} {symbol} for {username} at {price_per_unit}, new balance: {cash_balance}"
        );

        return Ok((cash_balance, owned));
    }

    /// Sells shares the account holds. Selling the whole position removes the
    /// holding entry. Returns the new balance and the remaining quantity.
    pub fn sell(&mut self, username: &Username, symbol: &Symbol, quantity: u32) -> Result<(Money, u32)> {
        if quantity == 0 {
            Err(TradingServiceError::InvalidQuantity(quantity))?
        }

        let account = self
            .account_service
            .find_mut(username)
            .ok_or_else(|| AccountServiceError::AccountNotFound(username.clone()))?;

        let owned = account.quantity_owned(symbol);

        if owned == 0 {
            Err(TradingServiceError::NotOwned(symbol.clone()))?
        }

        if owned < quantity {
            Err(TradingServiceError::InsufficientShares {
                symbol: symbol.clone(),
                owned,
                requested: quantity,
            })?
        }

        let price_per_unit = self.oracle.price(symbol)?;
        let proceeds = price_per_unit.times(quantity)?;

        let timestamp = account.next_timestamp();

        let mut cash_balance = account.cash_balance;
        cash_balance.add(&proceeds)?;

        let remaining = owned - quantity;

        account.cash_balance = cash_balance;
        if remaining == 0 {
            account.holdings.remove(symbol);
        } else {
            account.holdings.insert(symbol.clone(), remaining);
        }
        account.record(Transaction {
            timestamp,
            tx_type: TransactionType::Sell {
                symbol: symbol.clone(),
                quantity,
                price_per_unit,
            },
            amount: proceeds,
            balance_after: cash_balance,
        });

        log::debug!(
            "Sold {quantity} {symbol} for {username} at {price_per_unit}, new balance: {cash_balance}"
        );

        return Ok((cash_balance, remaining));
    }

    pub fn portfolio_value(&self, username: &Username) -> Result<Money> {
        let metrics = self.metrics(username)?;
        return Ok(metrics.holdings_value);
    }

    pub fn total_value(&self, username: &Username) -> Result<Money> {
        let metrics = self.metrics(username)?;
        return Ok(metrics.total_value);
    }

    pub fn profit_loss(&self, username: &Username) -> Result<ProfitLoss> {
        let metrics = self.metrics(username)?;
        return Ok(metrics.profit_loss);
    }

    pub fn metrics(&self, username: &Username) -> Result<PortfolioMetrics> {
        let account = self.find_account(username)?;
        return self.compute_metrics(account);
    }

    /// Transaction log in reverse chronological order, newest first
    pub fn transaction_history(&self, username: &Username) -> Result<Vec<&Transaction>> {
        let account = self.find_account(username)?;
        return Ok(account.transactions.iter().rev().collect());
    }

    /// Display rows for the holdings table, sorted by symbol
    pub fn holdings_report(&self, username: &Username) -> Result<Vec<HoldingReport>> {
        let account = self.find_account(username)?;

        let mut symbols: Vec<&Symbol> = account
            .holdings
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(symbol, _)| symbol)
            .collect();
        symbols.sort();

        let mut rows = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let quantity = account.quantity_owned(symbol);
            let price = self.oracle.price(symbol)?;
            let market_value = price.times(quantity)?;

            rows.push(HoldingReport::new(symbol, quantity, price, market_value));
        }

        return Ok(rows);
    }

    /// Display rows for the transaction history view, newest first
    pub fn history_report(&self, username: &Username) -> Result<Vec<HistoryReport>> {
        let account = self.find_account(username)?;

        let rows = account
            .transactions
            .iter()
            .rev()
            .map(HistoryReport::from_transaction)
            .collect();

        return Ok(rows);
    }

    /// One report row per account, sorted by username
    pub fn build_report(&self) -> Result<Vec<AccountReport>> {
        let mut accounts: Vec<&Account> = self.account_service.accounts().collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));

        let mut report = Vec::with_capacity(accounts.len());

        for account in accounts {
            let metrics = self.compute_metrics(account)?;
            report.push(AccountReport::new(&account.username, &metrics));
        }

        return Ok(report);
    }

    fn find_account(&self, username: &Username) -> Result<&Account> {
        let account = self
            .account_service
            .find(username)
            .ok_or_else(|| AccountServiceError::AccountNotFound(username.clone()))?;

        return Ok(account);
    }

    fn compute_metrics(&self, account: &Account) -> Result<PortfolioMetrics> {
        let mut holdings_value = Money::ZERO;

        for (symbol, quantity) in account.holdings.iter() {
            if *quantity == 0 {
                continue;
            }

            let price = self.oracle.price(symbol)?;
            holdings_value.add(&price.times(*quantity)?)?;
        }

        let mut total_value = holdings_value;
        total_value.add(&account.cash_balance)?;

        let mut pl_amount = total_value;
        pl_amount.sub(&account.net_deposits)?;

        return Ok(PortfolioMetrics {
            cash_balance: account.cash_balance,
            holdings_value,
            total_value,
            net_deposits: account.net_deposits,
            profit_loss: ProfitLoss::from_basis(pl_amount, account.net_deposits),
        });
    }
}
