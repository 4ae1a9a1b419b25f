use crate::chat::messages::{ChatMessage, ServerEvent};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Identity of one open socket. A user with two tabs has two connections.
pub type ConnectionId = Uuid;

const EVENT_CAPACITY: usize = 256;

/// Owns the presence registry and the broadcast channel of the chat room.
///
/// Presence is keyed by connection, so closing one of two tabs of the same
/// user leaves that user listed.
pub struct ChatHub {
    presence: RwLock<HashMap<ConnectionId, String>>,
    events: broadcast::Sender<ServerEvent>,
}

/// A joined client: its id plus the stream of room events.
pub struct ChatConnection {
    pub id: ConnectionId,
    pub events: broadcast::Receiver<ServerEvent>,
}

impl ChatHub {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            presence: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Registers a connection and announces the new presence list to all
    /// clients, the joiner included.
    pub async fn join(&self, name: impl Into<String>) -> ChatConnection {
        let name = name.into();
        let id = Uuid::new_v4();
        // Subscribe before announcing so the joiner sees its own user_list
        let receiver = self.events.subscribe();

        let mut presence = self.presence.write().await;
        presence.insert(id, name.clone());
        // Sent under the lock so user_list events go out in mutation order
        self.broadcast(ServerEvent::UserList(snapshot(&presence)));
        drop(presence);

        info!(connection = %id, user = %name, "Chat client connected");
        ChatConnection {
            id,
            events: receiver,
        }
    }

    /// Drops a connection and announces the updated presence list.
    pub async fn leave(&self, id: ConnectionId) {
        let mut presence = self.presence.write().await;
        let Some(name) = presence.remove(&id) else {
            return;
        };
        self.broadcast(ServerEvent::UserList(snapshot(&presence)));
        drop(presence);

        info!(connection = %id, user = %name, "Chat client disconnected");
    }

    /// Broadcasts `text` on behalf of a connection. Blank text and unknown
    /// connections are ignored; returns whether anything was sent.
    pub async fn post(&self, id: ConnectionId, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let Some(user) = self.presence.read().await.get(&id).cloned() else {
            debug!(connection = %id, "Message from unregistered connection dropped");
            return false;
        };

        self.broadcast(ServerEvent::NewMessage(ChatMessage {
            user,
            msg: text.to_string(),
        }));
        true
    }

    /// Sorted, de-duplicated names of connected users.
    pub async fn online_users(&self) -> Vec<String> {
        snapshot(&*self.presence.read().await)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }

    fn broadcast(&self, event: ServerEvent) {
        // No receivers just means nobody is listening right now
        let _ = self.events.send(event);
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot(presence: &HashMap<ConnectionId, String>) -> Vec<String> {
    presence
        .values()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
