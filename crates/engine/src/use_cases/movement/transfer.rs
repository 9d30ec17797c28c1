//! Room-to-room transfer of a contained object.

use tokio::sync::MutexGuard;
use uuid::Uuid;

use crate::entities::{ContainerOwner, Registry, Room, RoomState};

use super::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Moved,
    /// Source and destination are the same room.
    Unchanged,
}

/// Locks two distinct rooms in ascending id order, returning the guards in
/// argument order. Two moves crossing in opposite directions therefore always
/// contend on the same first lock.
pub async fn lock_pair<'a>(
    a: &'a Room,
    b: &'a Room,
) -> (MutexGuard<'a, RoomState>, MutexGuard<'a, RoomState>) {
    if a.id() < b.id() {
        let first = a.lock().await;
        let second = b.lock().await;
        (first, second)
    } else {
        let first = b.lock().await;
        let second = a.lock().await;
        (second, first)
    }
}

/// Moves `object` from `from` to `to` as one step for any observer.
///
/// The destination insert runs first so a full destination leaves both rooms
/// untouched. The registry association is updated while both room locks are
/// still held.
pub async fn transfer_between_rooms(
    registry: &Registry,
    object: Uuid,
    from: &Room,
    to: &Room,
) -> Result<Transfer, MoveError> {
    if from.id() == to.id() {
        return Ok(Transfer::Unchanged);
    }

    let (mut source, mut destination) = lock_pair(from, to).await;
    if destination.removed {
        return Err(MoveError::NoExit);
    }
    if !source.here.contains(object) {
        return Err(MoveError::NotInSource(object));
    }
    destination.here.add(object)?;
    source.here.remove(object);
    registry
        .set_container(object, ContainerOwner::Room(to.id()))
        .await;

    Ok(Transfer::Moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use mudhall_domain::{AreaId, AttributeMap, Coords, DomainError, ObjectContainer, RoomId};

    fn room(x: i32) -> Arc<Room> {
        Arc::new(Room::new(RoomId::new(), AreaId::new(), Coords::new(x, 0, 0)))
    }

    #[tokio::test]
    async fn object_ends_in_exactly_one_room() {
        let registry = Registry::new();
        let (a, b) = (room(0), room(1));
        let object = Uuid::new_v4();
        a.add_object(object).await.expect("place");

        let result = transfer_between_rooms(&registry, object, &a, &b).await;

        assert!(matches!(result, Ok(Transfer::Moved)));
        assert!(!a.contains(object).await);
        assert!(b.contains(object).await);
        assert_eq!(
            registry.container_of(object).await,
            Some(ContainerOwner::Room(b.id()))
        );
    }

    #[tokio::test]
    async fn full_destination_leaves_both_rooms_unchanged() {
        let registry = Registry::new();
        let a = room(0);
        let b = Arc::new(Room::restore(
            RoomId::new(),
            AreaId::new(),
            Coords::new(1, 0, 0),
            AttributeMap::new(),
            ObjectContainer::new(1),
        ));
        let occupant = Uuid::new_v4();
        let object = Uuid::new_v4();
        b.add_object(occupant).await.expect("fill");
        a.add_object(object).await.expect("place");

        let result = transfer_between_rooms(&registry, object, &a, &b).await;

        assert!(matches!(
            result,
            Err(MoveError::Domain(DomainError::ContainerFull { current: 1, max: 1 }))
        ));
        assert_eq!(a.contents().await, vec![object]);
        assert_eq!(b.contents().await, vec![occupant]);
        assert_eq!(registry.container_of(object).await, None);
    }

    #[tokio::test]
    async fn removed_destination_is_never_entered() {
        let registry = Registry::new();
        let (a, b) = (room(0), room(1));
        let object = Uuid::new_v4();
        a.add_object(object).await.expect("place");
        b.lock().await.removed = true;

        let result = transfer_between_rooms(&registry, object, &a, &b).await;

        assert!(matches!(result, Err(MoveError::NoExit)));
        assert_eq!(a.contents().await, vec![object]);
        assert!(b.contents().await.is_empty());
    }

    #[tokio::test]
    async fn object_missing_from_source_is_rejected() {
        let registry = Registry::new();
        let (a, b) = (room(0), room(1));
        let object = Uuid::new_v4();

        let result = transfer_between_rooms(&registry, object, &a, &b).await;

        assert!(matches!(result, Err(MoveError::NotInSource(id)) if id == object));
        assert!(b.contents().await.is_empty());
    }

    #[tokio::test]
    async fn same_room_is_a_no_op() {
        let registry = Registry::new();
        let a = room(0);
        let object = Uuid::new_v4();
        a.add_object(object).await.expect("place");

        let result = transfer_between_rooms(&registry, object, &a, &a).await;

        assert!(matches!(result, Ok(Transfer::Unchanged)));
        assert_eq!(a.contents().await, vec![object]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn crossing_moves_do_not_deadlock() {
        let registry = Arc::new(Registry::new());
        let (a, b) = (room(0), room(1));
        let east = Uuid::new_v4();
        let west = Uuid::new_v4();
        a.add_object(east).await.expect("place");
        b.add_object(west).await.expect("place");

        let spawn_shuttle = |object: Uuid, start: Arc<Room>, other: Arc<Room>| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let (mut here, mut there) = (start, other);
                for _ in 0..200 {
                    transfer_between_rooms(&registry, object, &here, &there)
                        .await
                        .expect("transfer");
                    std::mem::swap(&mut here, &mut there);
                }
            })
        };
        let first = spawn_shuttle(east, a.clone(), b.clone());
        let second = spawn_shuttle(west, b.clone(), a.clone());

        tokio::time::timeout(Duration::from_secs(10), async {
            first.await.expect("join");
            second.await.expect("join");
        })
        .await
        .expect("no deadlock");

        // 200 moves each: both objects are back where they started, once.
        assert_eq!(a.contents().await, vec![east]);
        assert_eq!(b.contents().await, vec![west]);
    }
}
