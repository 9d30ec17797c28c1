//! Application state and composition.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::commands::CommandSet;
use crate::entities::{Registry, World};
use crate::infrastructure::ports::{BehaviorPort, ClockPort, StoragePort};
use crate::scheduler::Scheduler;
use crate::stores::SessionManager;
use crate::use_cases;
use crate::use_cases::movement::{DropItem, MoveCharacter, TakeItem};
use crate::use_cases::persistence::{LoadWorld, SaveWorld};
use crate::use_cases::session::{LeaveWorld, Login, Teardown};
use crate::use_cases::{RoomEvents, RoomSync, WipeOrphanedInstances};

/// Main application state.
///
/// Built once at boot and shared as `Arc<App>` with the HTTP and WebSocket
/// handlers. Everything below holds only the dependencies it was given.
pub struct App {
    pub world: Arc<World>,
    pub sessions: Arc<SessionManager>,
    pub commands: Arc<CommandSet>,
    pub use_cases: UseCases,
    pub events: Arc<RoomEvents>,
    pub sync: Arc<RoomSync>,
    pub scheduler: Arc<Scheduler>,
    pub clock: Arc<dyn ClockPort>,
    pub started_at: DateTime<Utc>,
}

/// Container for all use cases.
pub struct UseCases {
    pub movement: use_cases::MovementUseCases,
    pub session: use_cases::SessionUseCases,
    pub persistence: use_cases::PersistenceUseCases,
    pub maintenance: Arc<WipeOrphanedInstances>,
}

impl App {
    pub fn new(
        storage: Arc<dyn StoragePort>,
        behavior: Arc<dyn BehaviorPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let registry = Arc::new(Registry::new());
        let world = Arc::new(World::new(registry));
        let sessions = Arc::new(SessionManager::new());

        let sync = Arc::new(RoomSync::new(world.clone()));
        let events = Arc::new(RoomEvents::new(world.clone(), behavior, sync.clone()));

        // Movement
        let movement = use_cases::MovementUseCases::new(
            Arc::new(MoveCharacter::new(world.clone(), events.clone())),
            Arc::new(TakeItem::new(world.clone(), events.clone())),
            Arc::new(DropItem::new(world.clone(), events.clone())),
        );

        // Session lifecycle
        let leave_world = Arc::new(LeaveWorld::new(
            world.clone(),
            events.clone(),
            clock.clone(),
        ));
        let session = use_cases::SessionUseCases::new(
            Arc::new(Login::new(world.clone(), events.clone(), clock.clone())),
            leave_world.clone(),
            Arc::new(Teardown::new(sessions.clone(), leave_world)),
        );

        // Persistence and maintenance
        let save = Arc::new(SaveWorld::new(world.clone(), storage.clone()));
        let persistence = use_cases::PersistenceUseCases::new(
            Arc::new(LoadWorld::new(world.clone(), storage)),
            save.clone(),
        );
        let maintenance = Arc::new(WipeOrphanedInstances::new(world.clone()));

        let scheduler = Arc::new(Scheduler::standard(
            maintenance.clone(),
            save,
            clock.clone(),
        ));

        Self {
            world,
            sessions,
            commands: Arc::new(CommandSet::standard()),
            use_cases: UseCases {
                movement,
                session,
                persistence,
                maintenance,
            },
            events,
            sync,
            scheduler,
            started_at: clock.now(),
            clock,
        }
    }
}
