mod account;
mod metrics;
mod snapshot;
mod transaction;

pub use account::Account;
pub use metrics::{PortfolioMetrics, ProfitLoss};
pub use snapshot::{Snapshot, SnapshotError};
pub use transaction::{Transaction, TransactionType};
