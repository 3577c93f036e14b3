mod account_report;
pub mod ids;
pub mod input;
pub mod models;
mod money;
mod oracle;
mod result;
pub mod services;

pub use account_report::{AccountReport, HistoryReport, HoldingReport};
pub use money::{Money, MoneyError};
pub use oracle::{FixedPriceOracle, OracleError, PriceOracle};
pub use result::Result;

/// Wires the default engine: an empty account registry over the fixed-price
/// symbol universe
pub fn build_trading_service() -> services::TradingService<FixedPriceOracle> {
    let account_service = services::AccountService::new();
    let trading_service =
        services::TradingService::new(account_service, FixedPriceOracle::with_default_symbols());

    return trading_service;
}
