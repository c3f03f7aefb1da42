
use actix::prelude::*;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::config::HandVisibility;
use crate::protocol::{PodiumEntry, RoundSnapshot};
use crate::services::round::{ConnId, ConnectionInfo, ErrorNotice, RoundBroadcaster};
use crate::ws::protocol::ServerMsg;
use crate::ws::session::HubEvent;

struct SessionEntry {
    user_id: String,
    recipient: Recipient<HubEvent>,
}

/// Live websocket sessions keyed by connection id. Fans round events out to
/// them, applying the hand-visibility policy per viewer.
pub struct WsRegistry {
    sessions: DashMap<ConnId, SessionEntry>,
    visibility: HandVisibility,
}

impl WsRegistry {
    pub fn new(visibility: HandVisibility) -> Self {
        Self {
            sessions: DashMap::new(),
            visibility,
        }
    }

    pub fn register(&self, conn: ConnId, user_id: String, recipient: Recipient<HubEvent>) {
        debug!(%conn, %user_id, "session registered");
        self.sessions.insert(conn, SessionEntry { user_id, recipient });
    }

    pub fn unregister(&self, conn: ConnId) {
        if self.sessions.remove(&conn).is_some() {
            debug!(%conn, "session unregistered");
        }
    }

    pub fn active_connections_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn send_to(&self, conn: ConnId, msg: ServerMsg) {
        match self.sessions.get(&conn) {
            Some(entry) => entry.recipient.do_send(HubEvent::new(msg)),
            None => warn!(%conn, "dropping message for unknown session"),
        }
    }

    pub fn broadcast(&self, msg: ServerMsg) {
        let event = HubEvent::new(msg);
        for entry in self.sessions.iter() {
            entry.recipient.do_send(event.clone());
        }
    }
}

impl RoundBroadcaster for WsRegistry {
    fn state(&self, snapshot: &RoundSnapshot) {
        if self.visibility == HandVisibility::Exposed {
            self.broadcast(ServerMsg::GameState {
                state: snapshot.clone(),
            });
            return;
        }
        for entry in self.sessions.iter() {
            let state = snapshot.for_viewer(&entry.user_id, self.visibility);
            entry
                .recipient
                .do_send(HubEvent::new(ServerMsg::GameState { state }));
        }
    }

    fn podium(&self, podium: &[PodiumEntry]) {
        self.broadcast(ServerMsg::GameEnd {
            podium: podium.to_vec(),
        });
    }

    fn error(&self, target: Option<ConnId>, notice: &ErrorNotice) {
        let msg = ServerMsg::Error {
            code: notice.code,
            message: notice.message.clone(),
        };
        match target {
            Some(conn) => self.send_to(conn, msg),
            None => self.broadcast(msg),
        }
    }

    fn connections(&self, connections: &[ConnectionInfo]) {
        self.broadcast(ServerMsg::Connections {
            connections: connections.to_vec(),
        });
    }
}

impl Default for WsRegistry {
    fn default() -> Self {
        Self::new(HandVisibility::default())
    }
}
