//! Fan-out of room-level events to occupants and mob behavior scripts.

use std::sync::Arc;

use mudhall_domain::attributes::ATTR_SCRIPT;
use mudhall_domain::CharacterId;

use crate::entities::{Room, World};
use crate::infrastructure::behavior;
use crate::infrastructure::ports::BehaviorPort;
use crate::use_cases::sync::RoomSync;

pub const EVENT_CHARACTER_ENTERED: &str = "character_entered";
pub const EVENT_CHARACTER_LEFT: &str = "character_left";
pub const EVENT_CHARACTER_SAID: &str = "character_said";

pub struct RoomEvents {
    world: Arc<World>,
    behavior: Arc<dyn BehaviorPort>,
    sync: Arc<RoomSync>,
}

impl RoomEvents {
    pub fn new(world: Arc<World>, behavior: Arc<dyn BehaviorPort>, sync: Arc<RoomSync>) -> Self {
        Self {
            world,
            behavior,
            sync,
        }
    }

    /// Shows `text` to everyone in the room except `except`.
    pub async fn announce(&self, room: &Room, except: Option<CharacterId>, text: &str) {
        self.world.notify_room(room, except, text).await;
    }

    /// Fires `function` on every scripted mob in the room.
    pub async fn fire_mobs(&self, room: &Room, function: &'static str, args: Vec<String>) {
        for mob in self.world.mobs_in(room).await {
            if mob.attribute(ATTR_SCRIPT).await.is_empty() {
                continue;
            }
            behavior::fire(
                &self.behavior,
                mob.template_name().to_string(),
                mob.id().to_uuid(),
                function,
                args.clone(),
            );
        }
    }

    /// Pushes the room's object list to everyone in it.
    pub async fn refresh(&self, room: &Room) {
        self.sync.refresh_room(room).await;
    }
}
