use crate::ids::Symbol;
use crate::Money;
use crate::Result;

use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(Symbol),

    #[error("No price available for symbol: {0}")]
    PriceUnavailable(Symbol),
}

/// Synchronous price lookup. Quotes are not guaranteed stable across calls, so
/// callers must capture the returned value once per operation and reuse it.
pub trait PriceOracle {
    fn price(&self, symbol: &Symbol) -> Result<Money>;
}

/// Fixed quote table backing the simulation's supported symbol universe
pub struct FixedPriceOracle {
    quotes: HashMap<Symbol, Money>,
}

impl FixedPriceOracle {
    pub fn from_quotes(quotes: Vec<(Symbol, Money)>) -> Self {
        return Self {
            quotes: quotes.into_iter().collect(),
        };
    }

    pub fn with_default_symbols() -> Self {
        return Self::from_quotes(vec![
            (Symbol::new("AAPL"), Money(1_500_000)),
            (Symbol::new("TSLA"), Money(2_000_000)),
            (Symbol::new("GOOGL"), Money(1_800_000)),
        ]);
    }
}

impl PriceOracle for FixedPriceOracle {
    fn price(&self, symbol: &Symbol) -> Result<Money> {
        let quote = self
            .quotes
            .get(symbol)
            .ok_or_else(|| OracleError::UnknownSymbol(symbol.clone()))?;

        return Ok(*quote);
    }
}
