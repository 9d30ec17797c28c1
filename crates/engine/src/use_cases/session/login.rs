//! Authenticating a session as a character and placing it in the world.

use std::sync::Arc;

use mudhall_domain::{DomainError, Location};

use crate::entities::{Character, ContainerOwner, World};
use crate::infrastructure::ports::ClockPort;
use crate::stores::Session;
use crate::use_cases::room_events::{RoomEvents, EVENT_CHARACTER_ENTERED};

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Character not found")]
    CharacterNotFound,
    #[error("Password incorrect")]
    WrongPassword,
    #[error("Character is already logged in")]
    AlreadyLoggedIn,
    #[error("Session is closing")]
    SessionClosed,
    #[error("Character location {0} has no room")]
    RoomMissing(Location),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub struct Login {
    world: Arc<World>,
    events: Arc<RoomEvents>,
    clock: Arc<dyn ClockPort>,
}

impl Login {
    pub fn new(world: Arc<World>, events: Arc<RoomEvents>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            world,
            events,
            clock,
        }
    }

    pub async fn execute(
        &self,
        session: &Arc<Session>,
        name: &str,
        password: &str,
    ) -> Result<Arc<Character>, LoginError> {
        // 1. Credentials
        let character = self
            .world
            .character_by_name(name)
            .await
            .ok_or(LoginError::CharacterNotFound)?;
        if !character.check_password(password).await {
            return Err(LoginError::WrongPassword);
        }

        // 2. The room must exist before anything is attached
        let location = character.location().await;
        let room = self
            .world
            .room_for(location)
            .await
            .ok_or(LoginError::RoomMissing(location))?;

        // 3. Bind character and session both ways. A session already being
        //    torn down never gets a character.
        if !session.attach_character(Arc::clone(&character)).await {
            return Err(LoginError::SessionClosed);
        }
        if !character.attach_session(Arc::clone(session)).await {
            session.take_character().await;
            return Err(LoginError::AlreadyLoggedIn);
        }

        // 4. Place the character in its room
        let id = character.id().to_uuid();
        let placed = {
            let mut state = room.lock().await;
            let result = match state.here.add(id) {
                Ok(_) | Err(DomainError::Duplicate(_)) => Ok(()),
                Err(e) => Err(e),
            };
            if result.is_ok() {
                self.world
                    .registry()
                    .set_container(id, ContainerOwner::Room(room.id()))
                    .await;
            }
            result
        };
        if let Err(e) = placed {
            session.take_character().await;
            character.detach_session(self.clock.now()).await;
            return Err(e.into());
        }

        // Teardown that began meanwhile may have collected the character
        // before it was placed; undo the placement so nothing is left behind.
        if session.is_closed() {
            {
                let mut state = room.lock().await;
                state.here.remove(id);
                self.world.registry().clear_container(id).await;
            }
            session.take_character().await;
            character.detach_session(self.clock.now()).await;
            return Err(LoginError::SessionClosed);
        }
        character.lock().await.last_seen = Some(self.clock.now());

        tracing::info!(
            session_id = %session.id(),
            character = %character.name(),
            location = %location,
            "Character logged in"
        );

        // 5. Tell the room
        let text = format!("{} connected and appeared here with you.", character.name());
        self.events
            .announce(&room, Some(character.id()), &text)
            .await;
        self.events
            .fire_mobs(&room, EVENT_CHARACTER_ENTERED, vec![character.name().to_string()])
            .await;
        self.events.refresh(&room).await;

        Ok(character)
    }
}
