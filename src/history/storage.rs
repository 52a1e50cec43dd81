// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Storage seams for the history store: the key-value trait the host
//! implements, two ready-made backends, and the background writer that keeps
//! persistence off the caller's thread.
//!
//! The durability model is deliberately loose. In-memory state is
//! authoritative for the session; the backend is a best-effort snapshot for
//! the *next* session. Writes are fire-and-forget through a single worker
//! thread, which also gives every key a total write order - snapshots can be
//! stale, never interleaved.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{error, warn};

// =============================================================================
// CLOCK
// =============================================================================

/// Time source for history timestamps.
///
/// Injected so tests can pin the clock and assert on exact timestamps; real
/// hosts use [`SystemClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// KEY-VALUE STORE
// =============================================================================

/// Errors from a key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage i/o: {0}")]
    Io(#[from] io::Error),
    /// Catch-all for host-provided backends (a database error, a full quota).
    #[error("storage backend: {0}")]
    Backend(String),
}

/// A durable string-blob store, namespaced by key.
///
/// The history store persists under exactly two keys ([`super::HISTORY_KEY`]
/// and [`super::VOCABULARY_KEY`]), each holding one JSON blob. The host
/// brings whatever durability it already has - an app-preferences table, a
/// settings file, a test map.
///
/// Implementations are called from the background writer thread, so they
/// must be `Send + Sync`. They do not need to be fast: callers never wait on
/// a write.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the blob stored under `key`, or `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a key that doesn't exist is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend. The default for tests and for hosts that opt out of
/// persistence - the store works normally, it just forgets on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// File backend: one `<key>.json` file per key inside a directory.
///
/// Writes go to a dot-prefixed temp file first and rename into place, so a
/// crash mid-write leaves the previous snapshot intact rather than a
/// truncated file.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) the backing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(JsonFileStore { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// BACKGROUND WRITER
// =============================================================================

/// A single worker thread that executes persistence tasks in submit order.
///
/// One thread is the point: global submit order implies per-key write order,
/// so the newest snapshot always wins without any versioning. Task failures
/// are logged and swallowed - by the time a write runs, the in-memory change
/// it snapshots has already happened and is not rolled back.
pub(crate) struct PersistenceWriter {
    sender: Mutex<Option<mpsc::Sender<Box<dyn FnOnce() + Send>>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PersistenceWriter {
    pub(crate) fn spawn() -> Self {
        let (sender, receiver) = mpsc::channel::<Box<dyn FnOnce() + Send>>();
        let handle = std::thread::Builder::new()
            .name("search-persist".to_string())
            .spawn(move || writer_loop(&receiver))
            .expect("failed to spawn persistence writer thread");
        PersistenceWriter {
            sender: Mutex::new(Some(sender)),
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Queue a task. Never blocks; after [`shutdown`](Self::shutdown) the
    /// task is dropped with a warning.
    pub(crate) fn submit(&self, task: Box<dyn FnOnce() + Send>) {
        match &*self.sender.lock() {
            Some(sender) => {
                if sender.send(task).is_err() {
                    warn!("persistence worker is gone; dropping write");
                }
            }
            None => warn!("persistence writer already shut down; dropping write"),
        }
    }

    /// Flush queued tasks and stop the worker. Idempotent.
    ///
    /// Closing the channel lets the worker drain everything already queued
    /// before it sees the disconnect, so shutdown doubles as a flush.
    pub(crate) fn shutdown(&self) {
        drop(self.sender.lock().take());
        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                error!("persistence worker thread panicked");
            }
        }
    }
}

impl Drop for PersistenceWriter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn writer_loop(receiver: &mpsc::Receiver<Box<dyn FnOnce() + Send>>) {
    while let Ok(task) = receiver.recv() {
        // A panicking task must not take the worker down with it; later
        // writes in the queue still run.
        if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)) {
            error!(
                "persistence task panicked: {:?}",
                e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
            );
        }
    }
}
