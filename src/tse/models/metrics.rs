use crate::Money;

/// Profit or loss relative to net deposits: always an absolute amount, and a
/// percentage of the cost basis when that basis is positive. Callers pick the
/// form they want to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitLoss {
    pub amount: Money,
    pub percent: Option<f64>,
}

impl ProfitLoss {
    pub fn from_basis(amount: Money, net_deposits: Money) -> Self {
        let percent = if net_deposits.is_positive() {
            Some(amount.0 as f64 / net_deposits.0 as f64 * 100.0)
        } else {
            None
        };

        return Self { amount, percent };
    }
}

/// One-call dashboard view of an account
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioMetrics {
    pub cash_balance: Money,
    pub holdings_value: Money,
    pub total_value: Money,
    pub net_deposits: Money,
    pub profit_loss: ProfitLoss,
}
