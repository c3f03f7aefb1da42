use serde::Serialize;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::protocol::{PodiumEntry, RoundSnapshot};
use crate::services::round::state::{ConnId, ConnectionInfo};

/// Client-facing rejection: stable code plus a human message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&AppError> for ErrorNotice {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code(),
            message: err.detail(),
        }
    }
}

/// Outbound side of the round service. Implementations must not block;
/// they are called after the round lock has been released.
pub trait RoundBroadcaster: Send + Sync {
    fn state(&self, snapshot: &RoundSnapshot);

    fn podium(&self, podium: &[PodiumEntry]);

    /// `None` addresses every connection.
    fn error(&self, target: Option<ConnId>, notice: &ErrorNotice);

    fn connections(&self, connections: &[ConnectionInfo]);
}
