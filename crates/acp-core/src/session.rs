//! Session multiplexer: one ordered job queue per `sessionId`, each drained
//! by its own `tokio::spawn`ed task (spec §4.4).
//!
//! A session is created lazily — the first time its id needs a worker — and
//! "restarted" the same way: if a worker task panics mid-job, its channel
//! closes, and the next lookup sees the closed sender and spawns a fresh
//! worker with the same initial state the caller passed in, per spec's
//! restart policy (§4.4, "Failure semantics").

use acp_schema::SessionId;
use std::collections::HashMap;
use std::sync::Mutex as StdMutex;
use tokio::sync::mpsc;

/// Registry of per-session job queues.
///
/// `J` is whatever job enum the owning dispatcher defines (prompt request +
/// reply channel, cancel notification, …); the registry itself doesn't
/// interpret jobs, only routes them to the right session's queue.
pub struct SessionRegistry<J: Send + 'static> {
    sessions: StdMutex<HashMap<SessionId, mpsc::Sender<J>>>,
}

impl<J: Send + 'static> SessionRegistry<J> {
    pub fn new() -> Self {
        Self {
            sessions: StdMutex::new(HashMap::new()),
        }
    }

    /// Get the live sender for `id`, spawning a fresh worker (via
    /// `spawn_worker`) if there is none yet or the previous one has died.
    pub fn sender_for<F>(&self, id: SessionId, spawn_worker: F) -> mpsc::Sender<J>
    where
        F: FnOnce(mpsc::Receiver<J>),
    {
        let mut sessions = self.sessions.lock().expect("session registry mutex poisoned");
        if let Some(tx) = sessions.get(&id) {
            if !tx.is_closed() {
                return tx.clone();
            }
        }

        let (tx, rx) = mpsc::channel(32);
        spawn_worker(rx);
        sessions.insert(id, tx.clone());
        tx
    }

    /// Drop a session's queue outright (e.g. on connection shutdown).
    pub fn remove(&self, id: &SessionId) {
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .remove(id);
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        let sessions = self.sessions.lock().expect("session registry mutex poisoned");
        sessions.get(id).is_some_and(|tx| !tx.is_closed())
    }
}

impl<J: Send + 'static> Default for SessionRegistry<J> {
    fn default() -> Self {
        Self::new()
    }
}
