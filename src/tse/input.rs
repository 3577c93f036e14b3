use crate::ids::{Symbol, Username};
use crate::Money;
use crate::Result;

use serde::Deserialize;

use thiserror::Error;

/// Represents an input row that a string would deserialize into
#[derive(Deserialize, Debug, Clone)]
pub struct InputEvent {
    #[serde(rename = "type")]
    pub typ: InputEventType,

    pub username: String,
    pub amount: Option<String>,
    pub symbol: Option<String>,
    pub quantity: Option<u32>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum InputEventType {
    Create,
    Deposit,
    Withdraw,
    Buy,
    Sell,
}

#[derive(Error, Debug)]
pub enum InputParseError {
    #[error("Error parsing input event: amount value missing: {0:?}")]
    MissingAmount(InputEvent),

    #[error("Error parsing input event: symbol missing: {0:?}")]
    MissingSymbol(InputEvent),

    #[error("Error parsing input event: quantity missing: {0:?}")]
    MissingQuantity(InputEvent),

    #[error("Error parsing input event: negative amount values not supported: {0:?}")]
    NegativeAmount(InputEvent),
}

/// Typed command, forcing correct handling through the type-system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        username: Username,
        initial_deposit: Money,
    },
    Deposit {
        username: Username,
        amount: Money,
    },
    Withdraw {
        username: Username,
        amount: Money,
    },
    Buy {
        username: Username,
        symbol: Symbol,
        quantity: u32,
    },
    Sell {
        username: Username,
        symbol: Symbol,
        quantity: u32,
    },
}

impl InputEvent {
    pub fn parse_command(self) -> Result<Command> {
        let username = Username::new(&self.username);

        let command = match self.typ {
            InputEventType::Create => Command::Create {
                initial_deposit: self.parse_amount()?,
                username,
            },
            InputEventType::Deposit => Command::Deposit {
                amount: self.parse_amount()?,
                username,
            },
            InputEventType::Withdraw => Command::Withdraw {
                amount: self.parse_amount()?,
                username,
            },
            InputEventType::Buy => Command::Buy {
                symbol: self.parse_symbol()?,
                quantity: self.parse_quantity()?,
                username,
            },
            InputEventType::Sell => Command::Sell {
                symbol: self.parse_symbol()?,
                quantity: self.parse_quantity()?,
                username,
            },
        };

        Ok(command)
    }

    fn parse_amount(&self) -> Result<Money> {
        let raw = self
            .amount
            .clone()
            .ok_or_else(|| InputParseError::MissingAmount(self.clone()))?;

        let amount = Money::parse(raw)?;

        if amount.is_negative() {
            Err(InputParseError::NegativeAmount(self.clone()))?
        }

        Ok(amount)
    }

    fn parse_symbol(&self) -> Result<Symbol> {
        let raw = self
            .symbol
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| InputParseError::MissingSymbol(self.clone()))?;

        Ok(Symbol::new(raw))
    }

    fn parse_quantity(&self) -> Result<u32> {
        let quantity = self
            .quantity
            .ok_or_else(|| InputParseError::MissingQuantity(self.clone()))?;

        Ok(quantity)
    }
}
