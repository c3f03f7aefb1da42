use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ErrorCode;
use crate::services::round::{ConnId, ConnectionInfo, RoundService};
use crate::state::app_state::AppState;
use crate::ws::hub::WsRegistry;
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// Identity a client presents on connect. Missing values are generated and
/// handed back in the `session` event so the client can persist them.
#[derive(Debug, Default, Deserialize)]
pub struct IdentityQuery {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<IdentityQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let IdentityQuery {
        user_id,
        session_id,
    } = query.into_inner();
    let identity = ConnectionInfo {
        user_id: non_blank(user_id).unwrap_or_else(|| Uuid::new_v4().to_string()),
        session_id: non_blank(session_id).unwrap_or_else(|| Uuid::new_v4().to_string()),
    };

    let session = WsSession::new(
        Uuid::new_v4(),
        identity,
        app_state.round(),
        app_state.registry(),
    );
    ws::start(session, &req, stream)
}

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct HubEvent {
    msg: Arc<ServerMsg>,
}

impl HubEvent {
    pub fn new(msg: ServerMsg) -> Self {
        Self { msg: Arc::new(msg) }
    }

    pub fn msg(&self) -> &ServerMsg {
        &self.msg
    }
}

pub struct WsSession {
    conn_id: ConnId,
    identity: ConnectionInfo,
    round: Arc<RoundService>,
    registry: Arc<WsRegistry>,

    last_heartbeat: Instant,
}

impl WsSession {
    fn new(
        conn_id: ConnId,
        identity: ConnectionInfo,
        round: Arc<RoundService>,
        registry: Arc<WsRegistry>,
    ) -> Self {
        Self {
            conn_id,
            identity,
            round,
            registry,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    user_id = %actor.identity.user_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn dispatch(&self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let cmd: ClientMsg = match serde_json::from_str(text) {
            Ok(cmd) => cmd,
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] malformed message");
                Self::send_json(
                    ctx,
                    &ServerMsg::Error {
                        code: ErrorCode::BadRequest,
                        message: "Malformed message.".to_string(),
                    },
                );
                return;
            }
        };

        let round = self.round.clone();
        let conn_id = self.conn_id;
        actix::spawn(async move {
            round.handle(conn_id, cmd.into()).await;
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            user_id = %self.identity.user_id,
            session_id = %self.identity.session_id,
            "[WS SESSION] started"
        );

        Self::send_json(
            ctx,
            &ServerMsg::Session {
                user_id: self.identity.user_id.clone(),
                session_id: self.identity.session_id.clone(),
            },
        );

        // register before the round rebroadcasts so this session sees it
        self.registry.register(
            self.conn_id,
            self.identity.user_id.clone(),
            ctx.address().recipient::<HubEvent>(),
        );
        let round = self.round.clone();
        let conn_id = self.conn_id;
        let identity = self.identity.clone();
        actix::spawn(async move {
            round.connect(conn_id, identity).await;
        });

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.registry.unregister(self.conn_id);
        let round = self.round.clone();
        let conn_id = self.conn_id;
        actix::spawn(async move {
            round.disconnect(conn_id).await;
        });
        info!(
            conn_id = %self.conn_id,
            user_id = %self.identity.user_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                self.dispatch(&text, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_json(
                    ctx,
                    &ServerMsg::Error {
                        code: ErrorCode::BadRequest,
                        message: "Binary frames are not supported.".to_string(),
                    },
                );
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<HubEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, event: HubEvent, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &event.msg);
    }
}
