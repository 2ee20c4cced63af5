//! Error type for `roster-store-sqlite`.

use roster_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl StoreError for Error {
  fn as_core(&self) -> Option<&roster_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      Error::Database(_) | Error::DateParse(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
