//! WebSocket entry point.
//!
//! Each upgraded socket becomes one [`Session`] driven by [`pump::run_session`].

mod pump;

pub use pump::{run_session, Frame};

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{future, SinkExt, StreamExt};

use crate::app::App;
use crate::stores::{Session, SESSION_QUEUE_CAPACITY};

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app): State<Arc<App>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, app: Arc<App>) {
    let (ws_sender, ws_receiver) = socket.split();
    let (session, rx) = Session::new(SESSION_QUEUE_CAPACITY);
    let session_id = session.id();

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let inbound = ws_receiver.map(|result| result.map(Frame::from));
    let outbound = ws_sender.with(|json: String| {
        future::ready(Ok::<_, axum::Error>(Message::Text(json.into())))
    });
    run_session(app, session, rx, inbound, outbound).await;

    tracing::info!(session_id = %session_id, "WebSocket connection terminated");
}

impl From<Message> for Frame {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Frame::Text(text.as_str().to_string()),
            Message::Close(_) => Frame::Close,
            // Pings are answered by axum; binary frames carry nothing for us.
            _ => Frame::Other,
        }
    }
}
