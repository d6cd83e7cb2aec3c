use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context};
use log::{error, info};
use tokio::sync::oneshot;

mod bookings;
mod files;
mod sessions;
mod users;

use crate::error::{Error, Result};
use crate::models::{Booking, TrainingSession, User};
use files::{read_or_init, serialize_document, write_document, write_raw, DataFiles};

pub use users::UserWithStats;

type StoreTask = Box<dyn FnOnce(&mut Collections) + Send + 'static>;

enum StoreCommand {
    Execute(StoreTask),
    Shutdown,
}

/// In-memory view of the three JSON documents. Only the store worker
/// thread ever holds a mutable reference, so every read-check-write
/// sequence submitted as one task runs as a critical section.
pub(crate) struct Collections {
    files: DataFiles,
    pub users: Vec<User>,
    pub bookings: Vec<Booking>,
    pub sessions: Vec<TrainingSession>,
}

impl Collections {
    fn load(files: DataFiles) -> anyhow::Result<Self> {
        let users = read_or_init(&files.users)?;
        let bookings = read_or_init(&files.bookings)?;
        let sessions = read_or_init(&files.sessions)?;
        Ok(Self {
            files,
            users,
            bookings,
            sessions,
        })
    }

    /// Re-read every document so memory matches the files again after a
    /// failed write.
    fn reload(&mut self) -> anyhow::Result<()> {
        self.users = read_or_init(&self.files.users)?;
        self.bookings = read_or_init(&self.files.bookings)?;
        self.sessions = read_or_init(&self.files.sessions)?;
        Ok(())
    }

    pub fn persist_users(&self) -> anyhow::Result<()> {
        write_document(&self.files.users, &self.users)
    }

    pub fn persist_bookings(&self) -> anyhow::Result<()> {
        write_document(&self.files.bookings, &self.bookings)
    }

    pub fn persist_sessions(&self) -> anyhow::Result<()> {
        write_document(&self.files.sessions, &self.sessions)
    }

    /// Persist the booking and session documents as one logical unit:
    /// both are serialized before either file is touched, so a
    /// serialization failure writes nothing.
    pub fn persist_bookings_and_sessions(&self) -> anyhow::Result<()> {
        let bookings_doc = serialize_document(&self.bookings)?;
        let sessions_doc = serialize_document(&self.sessions)?;
        write_raw(&self.files.bookings, &bookings_doc)?;
        write_raw(&self.files.sessions, &sessions_doc)
    }

    /// Persist all three documents; used by cascade deletes.
    pub fn persist_all(&self) -> anyhow::Result<()> {
        let users_doc = serialize_document(&self.users)?;
        let bookings_doc = serialize_document(&self.bookings)?;
        let sessions_doc = serialize_document(&self.sessions)?;
        write_raw(&self.files.users, &users_doc)?;
        write_raw(&self.files.bookings, &bookings_doc)?;
        write_raw(&self.files.sessions, &sessions_doc)
    }
}

struct StoreInner {
    sender: mpsc::Sender<StoreCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(StoreCommand::Shutdown) {
                error!("Failed to send shutdown to store thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join store thread: {join_err:?}");
            }
        }
    }
}

/// Handle to the booking store. All collection access runs on a single
/// dedicated worker thread, which serializes concurrent requests and
/// keeps the no-overlap invariant checkable against a current snapshot.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
    data_dir: Arc<PathBuf>,
}

impl Store {
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let (command_tx, command_rx) = mpsc::channel::<StoreCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let dir_for_thread = data_dir.clone();

        let worker = thread::Builder::new()
            .name("rowbook-store".into())
            .spawn(move || {
                let files = DataFiles::new(&dir_for_thread);
                let mut data = match Collections::load(files) {
                    Ok(data) => {
                        if ready_tx.send(Ok(())).is_err() {
                            error!("Store initialization receiver dropped before ready signal");
                            return;
                        }
                        data
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err.context("failed to load data documents")));
                        return;
                    }
                };

                while let Ok(command) = command_rx.recv() {
                    match command {
                        StoreCommand::Execute(task) => {
                            task(&mut data);
                        }
                        StoreCommand::Shutdown => break,
                    }
                }

                info!("Store thread shutting down");
            })
            .with_context(|| "failed to spawn store worker thread")?;

        ready_rx
            .recv()
            .context("store worker exited before signaling readiness")?
            .map_err(Error::Storage)?;

        info!("Store opened at {}", data_dir.display());

        Ok(Self {
            inner: Arc::new(StoreInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            data_dir: Arc::new(data_dir),
        })
    }

    pub fn data_dir(&self) -> &Path {
        self.data_dir.as_path()
    }

    /// Run a task against the collections on the worker thread. If the
    /// task fails after a write, memory is reloaded from the documents
    /// so the two never drift apart.
    pub(crate) async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Collections) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = StoreCommand::Execute(Box::new(move |data| {
            let result = task(data);
            if let Err(Error::Storage(err)) = &result {
                error!("Store task failed: {err:#}");
                if let Err(reload_err) = data.reload() {
                    error!("Failed to reload store after write error: {reload_err:#}");
                }
            }
            if reply_tx.send(result).is_err() {
                error!("Store caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to store thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| Error::Storage(anyhow!("store thread terminated unexpectedly")))?
    }
}
