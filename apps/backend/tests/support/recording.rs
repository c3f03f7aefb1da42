// Broadcaster that keeps every event for later assertions

use parking_lot::Mutex;
use shed_backend::errors::ErrorCode;
use shed_backend::protocol::{PodiumEntry, RoundSnapshot};
use shed_backend::services::round::{ConnId, ConnectionInfo, ErrorNotice, RoundBroadcaster};

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    State(RoundSnapshot),
    Podium(Vec<PodiumEntry>),
    Error {
        target: Option<ConnId>,
        notice: ErrorNotice,
    },
    Connections(Vec<ConnectionInfo>),
}

#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn states(&self) -> Vec<RoundSnapshot> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::State(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn last_state(&self) -> Option<RoundSnapshot> {
        self.states().pop()
    }

    pub fn podiums(&self) -> Vec<Vec<PodiumEntry>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::Podium(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(Option<ConnId>, ErrorNotice)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Recorded::Error { target, notice } => Some((target, notice)),
                _ => None,
            })
            .collect()
    }

    /// Codes of the error notices sent to `conn`, oldest first.
    pub fn error_codes_for(&self, conn: ConnId) -> Vec<ErrorCode> {
        self.errors()
            .into_iter()
            .filter(|(target, _)| *target == Some(conn))
            .map(|(_, notice)| notice.code)
            .collect()
    }
}

impl RoundBroadcaster for RecordingBroadcaster {
    fn state(&self, snapshot: &RoundSnapshot) {
        self.events.lock().push(Recorded::State(snapshot.clone()));
    }

    fn podium(&self, podium: &[PodiumEntry]) {
        self.events.lock().push(Recorded::Podium(podium.to_vec()));
    }

    fn error(&self, target: Option<ConnId>, notice: &ErrorNotice) {
        self.events.lock().push(Recorded::Error {
            target,
            notice: notice.clone(),
        });
    }

    fn connections(&self, connections: &[ConnectionInfo]) {
        self.events
            .lock()
            .push(Recorded::Connections(connections.to_vec()));
    }
}
