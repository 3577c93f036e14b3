use crate::ids::Username;
use crate::models::{Account, Transaction, TransactionType};
use crate::Money;
use crate::Result;

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use thiserror::Error;

pub type AccountStore = HashMap<Username, Account>;

#[derive(Error, Debug)]
pub enum AccountServiceError {
    #[error("Username already taken: {0}")]
    DuplicateUsername(Username),

    #[error("Username must not be empty")]
    InvalidUsername,

    #[error("Initial deposit must not be negative: {0}")]
    NegativeInitialDeposit(Money),

    #[error("Account not found: {0}")]
    AccountNotFound(Username),

    #[error("Amount must be positive: {0}")]
    InvalidAmount(Money),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },
}

/// Owns the account registry and the cash side of the ledger. Constructed per
/// session or test rather than held as a process-wide global.
pub struct AccountService {
    repository: AccountStore,
}

impl AccountService {
    pub fn new() -> Self {
        return Self {
            repository: AccountStore::new(),
        };
    }

    /// Opens a new account. A zero initial deposit is allowed and appends no
    /// transaction; a positive one is recorded as the account's first Deposit.
    pub fn create_account(
        &mut self,
        username: Username,
        initial_deposit: Money,
    ) -> Result<&mut Account> {
        if username.is_empty() {
            Err(AccountServiceError::InvalidUsername)?
        }

        if initial_deposit.is_negative() {
            Err(AccountServiceError::NegativeInitialDeposit(initial_deposit))?
        }

        let account = match self.repository.entry(username.clone()) {
            Entry::Occupied(_) => Err(AccountServiceError::DuplicateUsername(username))?,
            Entry::Vacant(entry) => entry.insert(Account::new(username)),
        };

        if initial_deposit.is_positive() {
            let timestamp = account.next_timestamp();

            account.cash_balance.add(&initial_deposit)?;
            account.net_deposits.add(&initial_deposit)?;
            account.record(Transaction {
                timestamp,
                tx_type: TransactionType::Deposit,
                amount: initial_deposit,
                balance_after: account.cash_balance,
            });
        }

        log::debug!(
            "Created account {} with initial deposit {initial_deposit}",
            account.username
        );

        return Ok(account);
    }

    pub fn deposit(&mut self, username: &Username, amount: Money) -> Result<Money> {
        let account = self
            .find_mut(username)
            .ok_or_else(|| AccountServiceError::AccountNotFound(username.clone()))?;

        if !amount.is_positive() {
            Err(AccountServiceError::InvalidAmount(amount))?
        }

        let timestamp = account.next_timestamp();

        let mut cash_balance = account.cash_balance;
        let mut net_deposits = account.net_deposits;
        cash_balance.add(&amount)?;
        net_deposits.add(&amount)?;

        // Commit only once every step has succeeded
        account.cash_balance = cash_balance;
        account.net_deposits = net_deposits;
        account.record(Transaction {
            timestamp,
            tx_type: TransactionType::Deposit,
            amount,
            balance_after: cash_balance,
        });

        log::debug!("Deposited {amount} into {username}, new balance: {cash_balance}");

        return Ok(cash_balance);
    }

    pub fn withdraw(&mut self, username: &Username, amount: Money) -> Result<Money> {
        let account = self
            .find_mut(username)
            .ok_or_else(|| AccountServiceError::AccountNotFound(username.clone()))?;

        if !amount.is_positive() {
            Err(AccountServiceError::InvalidAmount(amount))?
        }

        if amount > account.cash_balance {
            Err(AccountServiceError::InsufficientFunds {
                requested: amount,
                available: account.cash_balance,
            })?
        }

        let timestamp = account.next_timestamp();

        let mut cash_balance = account.cash_balance;
        let mut net_deposits = account.net_deposits;
        let mut tx_amount = Money::ZERO;
        cash_balance.sub(&amount)?;
        net_deposits.sub(&amount)?;
        tx_amount.sub(&amount)?;

        account.cash_balance = cash_balance;
        account.net_deposits = net_deposits;
        account.record(Transaction {
            timestamp,
            tx_type: TransactionType::Withdraw,
            amount: tx_amount,
            balance_after: cash_balance,
        });

        log::debug!("Withdrew {amount} from {username}, new balance: {cash_balance}");

        return Ok(cash_balance);
    }

    pub fn find(&self, username: &Username) -> Option<&Account> {
        return self.repository.get(username);
    }

    pub fn find_mut(&mut self, username: &Username) -> Option<&mut Account> {
        return self.repository.get_mut(username);
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        return self.repository.values();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::Snapshot;

    const SOME_DEPOSIT: Money = Money(10_000_000);

    fn trader1() -> Username {
        Username::new("trader1")
    }

    #[test]
    fn create_account_with_zero_deposit() {
        let mut service = AccountService::new();

        let account = service.create_account(trader1(), Money::ZERO).unwrap();

        assert_eq!(account.cash_balance, Money::ZERO);
        assert_eq!(account.net_deposits, Money::ZERO);
        assert!(account.transactions.is_empty());
    }

    #[test]
    fn create_account_records_nonzero_initial_deposit() {
        let mut service = AccountService::new();

        let account = service.create_account(trader1(), SOME_DEPOSIT).unwrap();

        assert_eq!(account.cash_balance, SOME_DEPOSIT);
        assert_eq!(account.net_deposits, SOME_DEPOSIT);
        assert_eq!(account.transactions.len(), 1);
        assert_eq!(account.transactions[0].tx_type, TransactionType::Deposit);
        assert_eq!(account.transactions[0].balance_after, SOME_DEPOSIT);
    }

    #[test]
    fn create_account_rejects_duplicates() {
        let mut service = AccountService::new();

        service.create_account(trader1(), Money::ZERO).unwrap();

        let err = service.create_account(trader1(), Money::ZERO).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AccountServiceError>(),
            Some(AccountServiceError::DuplicateUsername(_))
        ));
    }

    #[test]
    fn create_account_rejects_empty_username() {
        let mut service = AccountService::new();

        let err = service
            .create_account(Username::new("   "), Money::ZERO)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AccountServiceError>(),
            Some(AccountServiceError::InvalidUsername)
        ));
    }

    #[test]
    fn create_account_rejects_negative_deposit() {
        let mut service = AccountService::new();

        let err = service
            .create_account(trader1(), Money(-1))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AccountServiceError>(),
            Some(AccountServiceError::NegativeInitialDeposit(Money(-1)))
        ));
        assert!(service.find(&trader1()).is_none());
    }

    #[test]
    fn deposit_increases_balance_and_net_deposits() {
        let mut service = AccountService::new();
        service.create_account(trader1(), Money::ZERO).unwrap();

        let balance = service.deposit(&trader1(), SOME_DEPOSIT).unwrap();

        assert_eq!(balance, SOME_DEPOSIT);

        let account = service.find(&trader1()).unwrap();
        assert_eq!(account.net_deposits, SOME_DEPOSIT);
        assert_eq!(account.transactions.len(), 1);
    }

    #[test]
    fn deposit_rejects_non_positive_amounts() {
        let mut service = AccountService::new();
        service.create_account(trader1(), Money::ZERO).unwrap();

        for amount in [Money::ZERO, Money(-50_000)] {
            let err = service.deposit(&trader1(), amount).unwrap_err();

            assert!(matches!(
                err.downcast_ref::<AccountServiceError>(),
                Some(AccountServiceError::InvalidAmount(_))
            ));
        }

        assert!(service.find(&trader1()).unwrap().transactions.is_empty());
    }

    #[test]
    fn withdraw_at_exact_balance_succeeds() {
        let mut service = AccountService::new();
        service.create_account(trader1(), SOME_DEPOSIT).unwrap();

        let balance = service.withdraw(&trader1(), SOME_DEPOSIT).unwrap();

        assert_eq!(balance, Money::ZERO);
        assert_eq!(service.find(&trader1()).unwrap().net_deposits, Money::ZERO);
    }

    #[test]
    fn withdraw_one_unit_over_balance_fails_and_leaves_state_unchanged() {
        let mut service = AccountService::new();
        service.create_account(trader1(), SOME_DEPOSIT).unwrap();

        let err = service
            .withdraw(&trader1(), Money(SOME_DEPOSIT.0 + 1))
            .unwrap_err();

        match err.downcast_ref::<AccountServiceError>() {
            Some(AccountServiceError::InsufficientFunds {
                requested,
                available,
            }) => {
                assert_eq!(*requested, Money(SOME_DEPOSIT.0 + 1));
                assert_eq!(*available, SOME_DEPOSIT);
            }
            other => panic!("Unexpected error: {other:?}"),
        }

        let account = service.find(&trader1()).unwrap();
        assert_eq!(account.cash_balance, SOME_DEPOSIT);
        assert_eq!(account.transactions.len(), 1);
    }

    #[test]
    fn unknown_account_is_reported() {
        let mut service = AccountService::new();

        let err = service.deposit(&trader1(), SOME_DEPOSIT).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AccountServiceError>(),
            Some(AccountServiceError::AccountNotFound(_))
        ));
    }

    #[test]
    fn cash_operations_keep_log_and_state_in_sync() {
        let mut service = AccountService::new();
        service.create_account(trader1(), SOME_DEPOSIT).unwrap();
        service.deposit(&trader1(), Money(5_000_000)).unwrap();
        service.withdraw(&trader1(), Money(2_000_000)).unwrap();

        let account = service.find(&trader1()).unwrap();

        assert_eq!(
            Snapshot::rebuild(&account.transactions).unwrap(),
            Snapshot::of(account)
        );
    }
}
