use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}
