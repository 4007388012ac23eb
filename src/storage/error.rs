//! Error types for the storage layer.

use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database file is corrupt: {file_length} bytes is not a whole number of pages")]
    Corrupt { file_length: u64 },

    #[error("page number {page_num} is out of range (a table holds at most {max_pages} pages)")]
    PageOutOfRange { page_num: u32, max_pages: u32 },

    #[error("table is full: the root leaf has no free cells")]
    TableFull,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
