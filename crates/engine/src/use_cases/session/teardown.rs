//! Removing a character from the world and closing its session.

use std::sync::Arc;

use mudhall_domain::attributes::TEMP_GHOST;

use crate::entities::{Character, World};
use crate::infrastructure::ports::ClockPort;
use crate::stores::{Session, SessionManager};
use crate::use_cases::room_events::{RoomEvents, EVENT_CHARACTER_LEFT};

/// Takes a character out of its room and detaches its session.
pub struct LeaveWorld {
    world: Arc<World>,
    events: Arc<RoomEvents>,
    clock: Arc<dyn ClockPort>,
}

impl LeaveWorld {
    pub fn new(world: Arc<World>, events: Arc<RoomEvents>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            world,
            events,
            clock,
        }
    }

    pub async fn execute(&self, character: &Character) {
        let ghost = character.temp(TEMP_GHOST).await.is_some();
        let room = self.world.room_for(character.location().await).await;

        if let Some(room) = &room {
            let id = character.id().to_uuid();
            let mut state = room.lock().await;
            state.here.remove(id);
            self.world.registry().clear_container(id).await;
        }
        character.detach_session(self.clock.now()).await;

        tracing::info!(character = %character.name(), "Character logged out");

        if let (Some(room), false) = (room, ghost) {
            let text = format!(
                "{} disconnected and is no longer here with you.",
                character.name()
            );
            self.events.announce(&room, Some(character.id()), &text).await;
            self.events
                .fire_mobs(&room, EVENT_CHARACTER_LEFT, vec![character.name().to_string()])
                .await;
            self.events.refresh(&room).await;
        }
    }
}

/// Closes a session exactly once, whichever side notices first.
pub struct Teardown {
    sessions: Arc<SessionManager>,
    leave_world: Arc<LeaveWorld>,
}

impl Teardown {
    pub fn new(sessions: Arc<SessionManager>, leave_world: Arc<LeaveWorld>) -> Self {
        Self {
            sessions,
            leave_world,
        }
    }

    /// Returns false if the session was already torn down.
    pub async fn execute(&self, session: &Session) -> bool {
        if !session.begin_close() {
            return false;
        }

        if let Some(character) = session.take_character().await {
            self.leave_world.execute(&character).await;
        }
        session.cancel();
        self.sessions.remove(session.id());

        tracing::info!(session_id = %session.id(), "Session closed");
        true
    }
}
