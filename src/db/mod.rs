pub mod error;
pub mod init;
pub mod store;
pub mod utils;

pub use error::StoreError;
pub use store::PortfolioStore;
