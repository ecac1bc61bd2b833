pub mod alert;
pub mod common;
pub mod progression;
pub mod snapshot;
pub mod transaction;

pub use alert::{Alert, AlertColor, MessageKind, OutboundMessage};
pub use common::{total_amount, Amounted, UserId};
pub use progression::{ProgressionState, UserProfile};
pub use snapshot::{FinancialSnapshot, SpendingSignals};
pub use transaction::{Income, Transaction};
