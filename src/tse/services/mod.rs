mod account_service;
mod trading_service;

pub use account_service::{AccountService, AccountServiceError, AccountStore};
pub use trading_service::{TradingService, TradingServiceError};
