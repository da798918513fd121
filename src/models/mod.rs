pub mod growth;
pub mod holding;
pub mod period;
pub mod position;
pub mod quote;
pub mod snapshot;
pub mod transaction;

pub use growth::Growth;
pub use holding::{Holding, SHARES_PER_LOT};
pub use period::GrowthPeriod;
pub use position::Position;
pub use quote::{ApiProvider, Quote};
pub use snapshot::Snapshot;
pub use transaction::{TradeType, Transaction};
