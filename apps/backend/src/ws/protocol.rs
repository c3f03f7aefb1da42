use serde::{Deserialize, Serialize};

use crate::domain::{CardColour, CardId};
use crate::errors::ErrorCode;
use crate::protocol::{PodiumEntry, RoundSnapshot};
use crate::services::round::{ConnectionInfo, Intent};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Join,
    ToggleReady,
    DrawCard,
    PlayCard {
        card_id: CardId,
        #[serde(default)]
        colour: Option<CardColour>,
    },
    UpdateName {
        name: String,
    },
}

impl From<ClientMsg> for Intent {
    fn from(msg: ClientMsg) -> Self {
        match msg {
            ClientMsg::Join => Intent::Join,
            ClientMsg::ToggleReady => Intent::ToggleReady,
            ClientMsg::DrawCard => Intent::DrawCard,
            ClientMsg::PlayCard { card_id, colour } => Intent::PlayCard { card_id, colour },
            ClientMsg::UpdateName { name } => Intent::UpdateName { name },
        }
    }
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    Session {
        user_id: String,
        session_id: String,
    },

    Connections {
        connections: Vec<ConnectionInfo>,
    },

    GameState {
        state: RoundSnapshot,
    },

    GameEnd {
        podium: Vec<PodiumEntry>,
    },

    Error {
        code: ErrorCode,
        message: String,
    },
}
