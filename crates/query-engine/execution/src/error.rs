//! Errors that can be thrown when executing queries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    DB(#[from] sqlx::Error),
}
