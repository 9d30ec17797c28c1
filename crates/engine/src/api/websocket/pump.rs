//! Per-session message pump.
//!
//! The inbound loop reads one frame at a time and runs it to completion before
//! reading the next. The outbound loop drains the session queue into the
//! transport. Either loop failing cancels the session; teardown runs once the
//! inbound loop has stopped.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;

use mudhall_domain::attributes::TEMP_EDITOR_OPEN;
use mudhall_shared::{ClientMessage, ServerMessage};

use crate::app::App;
use crate::commands::execute_line;
use crate::stores::Session;

const INVALID_DATA: &str = "Your client sent invalid data.";
const PICTURE_UPLOADS_UNAVAILABLE: &str = "Picture uploads are not available on this server.";

/// Transport frame as seen by the pump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Close,
    Other,
}

/// Drives one session until the transport closes or the session is cancelled,
/// then tears it down.
pub async fn run_session<I, E, O>(
    app: Arc<App>,
    session: Arc<Session>,
    queue: mpsc::Receiver<ServerMessage>,
    inbound: I,
    outbound: O,
) where
    I: Stream<Item = Result<Frame, E>> + Unpin + Send,
    E: fmt::Display + Send,
    O: Sink<String> + Unpin + Send + 'static,
    O::Error: fmt::Display + Send,
{
    app.sessions.register(Arc::clone(&session));

    let writer = tokio::spawn(write_outbound(Arc::clone(&session), queue, outbound));
    read_inbound(&app, &session, inbound).await;
    app.use_cases.session.teardown.execute(&session).await;

    if let Err(e) = writer.await {
        tracing::warn!(session_id = %session.id(), error = %e, "Outbound task failed");
    }
}

// =============================================================================
// Inbound
// =============================================================================

async fn read_inbound<I, E>(app: &App, session: &Arc<Session>, mut inbound: I)
where
    I: Stream<Item = Result<Frame, E>> + Unpin,
    E: fmt::Display,
{
    let cancel = session.cancellation();
    loop {
        let frame = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            frame = inbound.next() => frame,
        };

        match frame {
            // A command may have torn the session down; nothing after it runs.
            Some(Ok(_)) if session.is_closed() => break,
            Some(Ok(Frame::Text(text))) => {
                if handle_text(app, session, &text).await.is_break() {
                    break;
                }
            }
            Some(Ok(Frame::Other)) => {}
            Some(Ok(Frame::Close)) | None => {
                tracing::info!(session_id = %session.id(), "WebSocket closed by client");
                break;
            }
            Some(Err(e)) => {
                tracing::warn!(session_id = %session.id(), error = %e, "WebSocket error");
                break;
            }
        }
    }
}

/// Handles one text frame. `Break` means the session must end.
async fn handle_text(app: &App, session: &Arc<Session>, text: &str) -> ControlFlow<()> {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::Command(line)) => {
            let line = line.strip_prefix('/').unwrap_or(&line);
            execute_line(app, session, line).await;
        }
        Ok(ClientMessage::ObjectEditorOpen(open)) => {
            if let Some(character) = session.character().await {
                character
                    .set_temp(TEMP_EDITOR_OPEN, open.then(|| "true".to_string()))
                    .await;
            }
        }
        Ok(ClientMessage::ObjectPictureUpload(_)) => {
            tracing::info!(session_id = %session.id(), "Picture upload ignored, no picture storage");
            session.show_text(PICTURE_UPLOADS_UNAVAILABLE);
        }
        Ok(ClientMessage::Unknown(kind)) => {
            tracing::debug!(session_id = %session.id(), kind = %kind, "Ignoring unknown message type");
        }
        Err(e) => {
            tracing::warn!(session_id = %session.id(), error = %e, "Failed to parse message");
            session.show_text(INVALID_DATA);
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}

// =============================================================================
// Outbound
// =============================================================================

async fn write_outbound<O>(
    session: Arc<Session>,
    mut queue: mpsc::Receiver<ServerMessage>,
    mut sink: O,
) where
    O: Sink<String> + Unpin,
    O::Error: fmt::Display,
{
    let cancel = session.cancellation();
    loop {
        let message = tokio::select! {
            biased;
            message = queue.recv() => match message {
                Some(message) => message,
                None => break,
            },
            _ = cancel.cancelled() => {
                // Flush what was queued before the cancel, e.g. `disconnect`.
                while let Ok(message) = queue.try_recv() {
                    if !write(&session, &mut sink, &message).await {
                        break;
                    }
                }
                break;
            }
        };

        if !write(&session, &mut sink, &message).await {
            session.cancel();
            break;
        }
    }

    if let Err(e) = sink.close().await {
        tracing::debug!(session_id = %session.id(), error = %e, "Transport already closed");
    }
}

/// Serializes and writes one message; false when the transport is gone.
async fn write<O>(session: &Session, sink: &mut O, message: &ServerMessage) -> bool
where
    O: Sink<String> + Unpin,
    O::Error: fmt::Display,
{
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(session_id = %session.id(), error = %e, "Failed to serialize message");
            return true;
        }
    };
    match sink.send(json).await {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(session_id = %session.id(), error = %e, "Failed to write to transport");
            false
        }
    }
}
