//! JSON file store.
//!
//! Layout: one pretty-printed file per kind under the data directory,
//! `{"next_id": <u64>, "entities": [...]}`. Writes go through a sibling
//! temp file and a rename so a crash never leaves a half-written book.

use super::{BookStore, StoreError, StoreResult};
use crate::book::BookSnapshot;
use crate::model::id::IdKind;
use crate::model::Entity;
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const ADDRESS_BOOK_FILE_NAME: &str = "addressbook.json";
pub const PROPERTY_BOOK_FILE_NAME: &str = "propertybook.json";

/// [`BookStore`] backed by JSON files in one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBookStore {
    data_dir: PathBuf,
}

impl JsonBookStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File holding books of `kind`.
    pub fn book_path(&self, kind: IdKind) -> PathBuf {
        let file_name = match kind {
            IdKind::Contact => ADDRESS_BOOK_FILE_NAME,
            IdKind::Property => PROPERTY_BOOK_FILE_NAME,
        };
        self.data_dir.join(file_name)
    }
}

impl BookStore for JsonBookStore {
    fn load_book<T>(&self) -> StoreResult<Option<BookSnapshot<T>>>
    where
        T: Entity + DeserializeOwned,
    {
        let started_at = Instant::now();
        let path = self.book_path(T::KIND);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=book_read module=storage status=missing kind={}",
                    T::KIND
                );
                return Ok(None);
            }
            Err(err) => {
                error!(
                    "event=book_read module=storage status=error kind={} error_code=io_failed error={}",
                    T::KIND,
                    err
                );
                return Err(StoreError::Io { path, source: err });
            }
        };

        match serde_json::from_str::<BookSnapshot<T>>(&text) {
            Ok(snapshot) => {
                info!(
                    "event=book_read module=storage status=ok kind={} count={} duration_ms={}",
                    T::KIND,
                    snapshot.entities.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(snapshot))
            }
            Err(err) => {
                error!(
                    "event=book_read module=storage status=error kind={} error_code=json_invalid line={} column={}",
                    T::KIND,
                    err.line(),
                    err.column()
                );
                Err(StoreError::Json { path, source: err })
            }
        }
    }

    fn save_book<T>(&self, snapshot: &BookSnapshot<T>) -> StoreResult<()>
    where
        T: Entity + Serialize,
    {
        let started_at = Instant::now();
        let path = self.book_path(T::KIND);

        let text = serde_json::to_string_pretty(snapshot).map_err(|err| StoreError::Json {
            path: path.clone(),
            source: err,
        })?;

        if let Err(err) = write_atomically(&self.data_dir, &path, &text) {
            error!(
                "event=book_write module=storage status=error kind={} error_code=io_failed error={}",
                T::KIND,
                err
            );
            return Err(StoreError::Io { path, source: err });
        }

        info!(
            "event=book_write module=storage status=ok kind={} count={} duration_ms={}",
            T::KIND,
            snapshot.entities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn write_atomically(dir: &Path, path: &Path, text: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, text)?;
    std::fs::rename(&tmp_path, path)
}
