use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

use crate::{KEY_LOG, KeyValueStore};

pub const MAX_ENTRIES: usize = 100;

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Keeps the most recent entries, newest first, in a key-value store.
pub struct StoreRepository<S> {
    store: Arc<S>,
}

impl<S> StoreRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore + 'static> Repository for StoreRepository<S> {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error> {
        self.store
            .try_load(KEY_LOG)
            .map(Option::unwrap_or_default)
            .map_err(|err| Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: Entry) -> Result<(), Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(MAX_ENTRIES);
        serde_json::to_string(&entries)
            .map_err(|err| Error::Unknown(err.to_string()))
            .and_then(|value| {
                self.store
                    .write(KEY_LOG, &value)
                    .map_err(|err| Error::Unknown(err.to_string()))
            })
    }
}

static LOGGER: Logger = Logger;

/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(repository: Arc<Mutex<dyn Repository>>) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    if let Ok(mut log) = LOG.lock() {
        *log = Some(repository);
    }
    log::set_max_level(LevelFilter::Debug);
    Ok(())
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(log) = LOG.lock() else {
            return;
        };
        if let Some(repository) = log.as_ref() {
            if let Ok(repository) = repository.lock() {
                // A failing write cannot be logged without recursing into the logger.
                let _ = repository.write_entry(Entry {
                    time: Utc::now().format("%b %d %H:%M:%S").to_string(),
                    level: record.level(),
                    message: record.args().to_string(),
                });
            }
        }
    }

    fn flush(&self) {}
}
