//! Persistence boundary for books.
//!
//! # Responsibility
//! - Define the load/save contract the core needs from storage.
//! - Provide the JSON file implementation used by the desktop shell.
//!
//! # Invariants
//! - A missing book file loads as "no saved book", not an error.
//! - Loaded entities pass the same validation as newly built ones.
//! - Every attribute and the next identifier value round-trip unchanged.

mod json_store;

pub use json_store::{JsonBookStore, ADDRESS_BOOK_FILE_NAME, PROPERTY_BOOK_FILE_NAME};

use crate::book::{BookError, BookSnapshot};
use crate::model::Entity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure while reading or writing a book.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// File parsed but its content violates a book invariant.
    Book(BookError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot access `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "malformed book file `{}`: {source}", path.display())
            }
            Self::Book(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Book(err) => Some(err),
        }
    }
}

impl From<BookError> for StoreError {
    fn from(value: BookError) -> Self {
        Self::Book(value)
    }
}

/// Load/save contract for persisted books, one slot per entity kind.
pub trait BookStore {
    /// Returns `None` when nothing has been saved for `T` yet.
    fn load_book<T>(&self) -> StoreResult<Option<BookSnapshot<T>>>
    where
        T: Entity + DeserializeOwned;

    fn save_book<T>(&self, snapshot: &BookSnapshot<T>) -> StoreResult<()>
    where
        T: Entity + Serialize;
}
