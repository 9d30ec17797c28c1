//! Walking a character through an exit.

use std::sync::Arc;

use mudhall_domain::attributes::TEMP_GHOST;
use mudhall_domain::Direction;

use crate::entities::{Character, Exit, Room, World};
use crate::use_cases::room_events::{RoomEvents, EVENT_CHARACTER_ENTERED, EVENT_CHARACTER_LEFT};

use super::{transfer_between_rooms, MoveError};

pub struct MoveOutcome {
    pub from: Arc<Room>,
    pub to: Arc<Room>,
}

pub struct MoveCharacter {
    world: Arc<World>,
    events: Arc<RoomEvents>,
}

impl MoveCharacter {
    pub fn new(world: Arc<World>, events: Arc<RoomEvents>) -> Self {
        Self { world, events }
    }

    pub async fn execute(
        &self,
        character: &Character,
        direction: Direction,
    ) -> Result<MoveOutcome, MoveError> {
        // 1. Resolve both ends before touching any container
        let from = self
            .world
            .room_for(character.location().await)
            .await
            .ok_or(MoveError::NoCurrentRoom)?;
        let to = match self.world.connected_room(&from, direction).await {
            Exit::Open(room) => room,
            Exit::Blocked(message) => return Err(MoveError::Blocked(message)),
            Exit::None => return Err(MoveError::NoExit),
        };

        // 2. Swap containers under both room locks
        transfer_between_rooms(
            self.world.registry(),
            character.id().to_uuid(),
            &from,
            &to,
        )
        .await?;

        // 3. Only then move the character's own pointer
        character.set_location(to.location()).await;

        tracing::debug!(
            character = %character.name(),
            from = %from.location(),
            to = %to.location(),
            "Character moved"
        );

        // 4. Notify both rooms from fresh occupant snapshots
        if character.temp(TEMP_GHOST).await.is_none() {
            let id = Some(character.id());
            let name = character.name().to_string();
            self.events
                .announce(&from, id, &format!("{} walks {}.", name, direction.towards()))
                .await;
            self.events
                .fire_mobs(&from, EVENT_CHARACTER_LEFT, vec![name.clone()])
                .await;
            self.events.refresh(&from).await;

            self.events
                .announce(
                    &to,
                    id,
                    &format!("{} walked in {}.", name, direction.opposite().from_side()),
                )
                .await;
            self.events
                .fire_mobs(&to, EVENT_CHARACTER_ENTERED, vec![name])
                .await;
            self.events.refresh(&to).await;
        }

        Ok(MoveOutcome { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{drain_texts, online_character, TestWorld};
    use mudhall_domain::Coords;

    #[tokio::test]
    async fn move_north_notifies_both_rooms() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0), Coords::new(0, 1, 0)]).await;
        let a = t.room(Coords::new(0, 0, 0)).await;
        let b = t.room(Coords::new(0, 1, 0)).await;
        let (bob, _bob_rx) = online_character(&t, "Bob", &a).await;
        let (alice, mut alice_rx) = online_character(&t, "Alice", &a).await;
        let (carol, mut carol_rx) = online_character(&t, "Carol", &b).await;

        let outcome = t
            .movement()
            .execute(&bob, Direction::North)
            .await
            .expect("move");

        assert_eq!(outcome.to.id(), b.id());
        assert!(!a.contains(bob.id().to_uuid()).await);
        assert!(b.contains(bob.id().to_uuid()).await);
        assert_eq!(bob.location().await, b.location());

        let names = |v: Vec<Arc<Character>>| v.iter().map(|c| c.name().to_string()).collect::<Vec<_>>();
        assert_eq!(names(t.world.occupants(&a, None).await), vec!["Alice"]);
        assert_eq!(names(t.world.occupants(&b, None).await), vec!["Carol", "Bob"]);

        assert!(drain_texts(&mut alice_rx).contains(&"Bob walks to the north.".to_string()));
        assert!(drain_texts(&mut carol_rx).contains(&"Bob walked in from the south.".to_string()));
        drop((alice, carol));
    }

    #[tokio::test]
    async fn missing_destination_is_rejected_without_mutation() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let a = t.room(Coords::new(0, 0, 0)).await;
        let (bob, _rx) = online_character(&t, "Bob", &a).await;

        let result = t.movement().execute(&bob, Direction::East).await;

        assert!(matches!(result, Err(MoveError::NoExit)));
        assert!(a.contains(bob.id().to_uuid()).await);
        assert_eq!(bob.location().await, a.location());
    }

    #[tokio::test]
    async fn blocked_exit_reports_its_message() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0), Coords::new(0, 1, 0)]).await;
        let a = t.room(Coords::new(0, 0, 0)).await;
        a.set_attribute("north", "!The portcullis is down.").await.expect("set");
        let (bob, _rx) = online_character(&t, "Bob", &a).await;

        let result = t.movement().execute(&bob, Direction::North).await;

        assert!(matches!(result, Err(MoveError::Blocked(Some(m))) if m == "The portcullis is down."));
    }

    #[tokio::test]
    async fn ghosts_move_silently() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0), Coords::new(0, 1, 0)]).await;
        let a = t.room(Coords::new(0, 0, 0)).await;
        let (bob, _bob_rx) = online_character(&t, "Bob", &a).await;
        let (_alice, mut alice_rx) = online_character(&t, "Alice", &a).await;
        bob.set_temp(TEMP_GHOST, Some("true".into())).await;

        t.movement().execute(&bob, Direction::North).await.expect("move");

        assert!(drain_texts(&mut alice_rx).is_empty());
    }
}
