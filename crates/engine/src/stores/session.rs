//! Live connection state.
//!
//! A `Session` exists from socket accept until teardown, whether or not a
//! character is attached. `SessionManager` is the active-session collection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use mudhall_domain::SessionId;
use mudhall_shared::ServerMessage;

use crate::entities::Character;

/// Outbound queue capacity per session.
pub const SESSION_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("Outbound queue is full")]
    Full,
    #[error("Session is closed")]
    Closed,
}

pub struct Session {
    id: SessionId,
    sender: mpsc::Sender<ServerMessage>,
    cancel: CancellationToken,
    closed: AtomicBool,
    character: Mutex<Option<Arc<Character>>>,
}

impl Session {
    /// Creates a session and the receiving end of its outbound queue.
    pub fn new(capacity: usize) -> (Arc<Self>, mpsc::Receiver<ServerMessage>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let session = Arc::new(Self {
            id: SessionId::new(),
            sender,
            cancel: CancellationToken::new(),
            closed: AtomicBool::new(false),
            character: Mutex::new(None),
        });
        (session, receiver)
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queues a message without waiting.
    ///
    /// A full queue means the client stopped reading: the session is cancelled
    /// so one slow client cannot hold messages for the rest of the world.
    pub fn send(&self, message: ServerMessage) -> Result<(), SendError> {
        match self.sender.try_send(message) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(session_id = %self.id, "Outbound queue full, disconnecting session");
                self.cancel.cancel();
                Err(SendError::Full)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(session_id = %self.id, "Dropped message for closed session");
                Err(SendError::Closed)
            }
        }
    }

    /// Sends a `showText` message, ignoring delivery failure.
    pub fn show_text(&self, text: impl Into<String>) {
        let _ = self.send(ServerMessage::text(text));
    }

    /// Marks the session closed. Returns true only for the first caller.
    pub fn begin_close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn character(&self) -> Option<Arc<Character>> {
        self.character.lock().await.clone()
    }

    /// Attaches `character` unless teardown has begun.
    ///
    /// The closed flag is read under the same lock `take_character` takes, so
    /// an attach either lands before teardown collects it or is refused.
    pub async fn attach_character(&self, character: Arc<Character>) -> bool {
        let mut slot = self.character.lock().await;
        if self.is_closed() {
            return false;
        }
        *slot = Some(character);
        true
    }

    pub async fn take_character(&self) -> Option<Arc<Character>> {
        self.character.lock().await.take()
    }
}

/// Active sessions keyed by id.
pub struct SessionManager {
    sessions: DashMap<SessionId, Arc<Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, session: Arc<Session>) {
        tracing::debug!(session_id = %session.id(), "Session registered");
        self.sessions.insert(session.id(), session);
    }

    pub fn remove(&self, id: SessionId) -> Option<Arc<Session>> {
        let removed = self.sessions.remove(&id).map(|(_, session)| session);
        if removed.is_some() {
            tracing::debug!(session_id = %id, "Session removed");
        }
        removed
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of every active session.
    pub fn all(&self) -> Vec<Arc<Session>> {
        self.sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Characters attached to an active session.
    pub async fn online_characters(&self) -> Vec<Arc<Character>> {
        let mut online = Vec::new();
        for session in self.all() {
            if let Some(character) = session.character().await {
                online.push(character);
            }
        }
        online
    }

    /// Sends to every session; failures are logged by `Session::send`.
    pub fn broadcast(&self, message: ServerMessage) {
        for session in self.all() {
            let _ = session.send(message.clone());
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn full_queue_cancels_the_session() {
        let (session, _rx) = Session::new(1);
        let token = session.cancellation();

        assert_eq!(session.send(ServerMessage::text("one")), Ok(()));
        assert_eq!(session.send(ServerMessage::text("two")), Err(SendError::Full));
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn send_after_receiver_dropped_is_closed() {
        let (session, rx) = Session::new(4);
        drop(rx);

        assert_eq!(session.send(ServerMessage::Disconnect), Err(SendError::Closed));
    }

    #[tokio::test]
    async fn begin_close_succeeds_once() {
        let (session, _rx) = Session::new(4);
        assert!(session.begin_close());
        assert!(!session.begin_close());
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn closed_session_refuses_a_character() {
        let (session, _rx) = Session::new(4);
        let bob = Arc::new(crate::test_support::character_with_password("Bob", ""));

        assert!(session.attach_character(Arc::clone(&bob)).await);
        session.begin_close();
        assert!(session.take_character().await.is_some());
        assert!(!session.attach_character(bob).await);
        assert!(session.character().await.is_none());
    }

    #[tokio::test]
    async fn messages_arrive_in_order() {
        let (session, mut rx) = Session::new(4);
        session.show_text("first");
        session.show_text("second");

        assert_eq!(rx.recv().await, Some(ServerMessage::text("first")));
        assert_eq!(rx.recv().await, Some(ServerMessage::text("second")));
    }

    #[tokio::test]
    async fn manager_broadcast_reaches_every_session() {
        let manager = SessionManager::new();
        let (a, mut rx_a) = Session::new(4);
        let (b, mut rx_b) = Session::new(4);
        manager.register(a.clone());
        manager.register(b);

        manager.broadcast(ServerMessage::text("Server restarting."));

        assert_eq!(rx_a.recv().await, Some(ServerMessage::text("Server restarting.")));
        assert_eq!(rx_b.recv().await, Some(ServerMessage::text("Server restarting.")));
        assert!(manager.remove(a.id()).is_some());
        assert!(manager.remove(a.id()).is_none());
        assert_eq!(manager.len(), 1);
    }
}
