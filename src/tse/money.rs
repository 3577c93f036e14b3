use crate::Result;

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoneyError {
    #[error("Overflow error while applying {0} operation on {1:?} and {2:?}")]
    Overflow(&'static str, Money, Money),

    #[error("Underflow error while applying {0} operation on {1:?} and {2:?}")]
    Underflow(&'static str, Money, Money),

    #[error("Money parse error: {0}, {1}")]
    Parse(&'static str, String),
}

/// Fixed-point amount with 4 decimal places: Money(15_000) == 1.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    const SCALE: i64 = 10_000;

    pub fn parse(string: String) -> Result<Self> {
        let trimmed = string.trim();

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let mut parts = unsigned.split('.');

        if parts.clone().count() > 2 {
            Err(MoneyError::Parse("Too many decimal points", string.clone()))?
        }

        let dollars = match parts.next() {
            None | Some("") => "0",
            Some(dollars) => dollars,
        };

        let cents = match parts.next() {
            None | Some("") => "0000".to_string(),
            Some(cents) => format!("{:0<4}", cents).chars().take(4).collect(),
        };

        let dollars: i64 = dollars.parse()?;
        let cents: i64 = cents.parse()?;

        let magnitude = dollars
            .checked_mul(Self::SCALE)
            .and_then(|value| value.checked_add(cents))
            .ok_or_else(|| MoneyError::Parse("Amount out of range", string.clone()))?;

        if negative {
            return Ok(Money(-magnitude));
        }

        return Ok(Money(magnitude));
    }

    pub fn is_positive(&self) -> bool {
        return self.0 > 0;
    }

    pub fn is_negative(&self) -> bool {
        return self.0 < 0;
    }

    /// Checked in-place addition. On failure, self is left unchanged.
    pub fn add(&mut self, other: &Self) -> Result {
        let a = self.0;
        let b = other.0;

        let sum = a.checked_add(b).ok_or_else(|| {
            if b > 0 {
                MoneyError::Overflow("add", Money(a), *other)
            } else {
                MoneyError::Underflow("add", Money(a), *other)
            }
        })?;

        self.0 = sum;

        return Ok(());
    }

    /// Checked in-place subtraction. On failure, self is left unchanged.
    pub fn sub(&mut self, other: &Self) -> Result {
        let a = self.0;
        let b = other.0;

        let diff = a.checked_sub(b).ok_or_else(|| {
            if b < 0 {
                MoneyError::Overflow("sub", Money(a), *other)
            } else {
                MoneyError::Underflow("sub", Money(a), *other)
            }
        })?;

        self.0 = diff;

        return Ok(());
    }

    /// Checked per-unit multiply, for costs and proceeds of share trades
    pub fn times(&self, quantity: u32) -> Result<Self> {
        let total = self
            .0
            .checked_mul(i64::from(quantity))
            .ok_or(MoneyError::Overflow(
                "times",
                *self,
                Money(i64::from(quantity)),
            ))?;

        return Ok(Self(total));
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();

        let dollars = abs / Self::SCALE as u64;
        let frac = abs % Self::SCALE as u64;

        if frac == 0 {
            return write!(f, "{sign}{dollars}");
        }

        let frac = format!("{frac:04}");
        let frac = frac.trim_end_matches('0');

        return write!(f, "{sign}{dollars}.{frac}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(Money::parse("150".to_string()).unwrap(), Money(1_500_000));
        assert_eq!(Money::parse("150.5".to_string()).unwrap(), Money(1_505_000));
        assert_eq!(Money::parse(".25".to_string()).unwrap(), Money(2_500));
        assert_eq!(Money::parse("0".to_string()).unwrap(), Money(0));
        assert_eq!(Money::parse("1.23456".to_string()).unwrap(), Money(12_345));
        assert_eq!(Money::parse("-3.25".to_string()).unwrap(), Money(-32_500));
        assert_eq!(Money::parse("-0.5".to_string()).unwrap(), Money(-5_000));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Money::parse("1.2.3".to_string()).is_err());
        assert!(Money::parse("abc".to_string()).is_err());
        assert!(Money::parse("12,5".to_string()).is_err());
    }

    #[test]
    fn add_and_sub() {
        let mut amount = Money(1_500_000);

        amount.add(&Money(2_500)).unwrap();
        assert_eq!(amount, Money(1_502_500));

        amount.sub(&Money(2_500)).unwrap();
        assert_eq!(amount, Money(1_500_000));
    }

    #[test]
    fn add_overflow_leaves_value_unchanged() {
        let mut amount = Money::MAX;

        assert!(amount.add(&Money(1)).is_err());
        assert_eq!(amount, Money::MAX);

        let mut amount = Money::MIN;

        assert!(amount.sub(&Money(1)).is_err());
        assert_eq!(amount, Money::MIN);
    }

    #[test]
    fn times() {
        assert_eq!(Money(1_500_000).times(5).unwrap(), Money(7_500_000));
        assert_eq!(Money(1_500_000).times(0).unwrap(), Money::ZERO);
        assert!(Money::MAX.times(2).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Money(1_500_000).to_string(), "150");
        assert_eq!(Money(1_505_000).to_string(), "150.5");
        assert_eq!(Money(1).to_string(), "0.0001");
        assert_eq!(Money(-5_000).to_string(), "-0.5");
        assert_eq!(Money(0).to_string(), "0");
    }
}
