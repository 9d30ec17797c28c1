//! Consistency repair passes run by the scheduler.

use std::sync::Arc;

use crate::entities::{EntityKind, World};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub checked: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Deletes item and mob instances that no container holds.
pub struct WipeOrphanedInstances {
    world: Arc<World>,
}

impl WipeOrphanedInstances {
    pub fn new(world: Arc<World>) -> Self {
        Self { world }
    }

    pub async fn execute(&self) -> SweepSummary {
        let registry = self.world.registry();
        let mut summary = SweepSummary::default();

        for kind in [EntityKind::ItemInstance, EntityKind::MobInstance] {
            for entity in registry.all_of_kind(kind).await {
                summary.checked += 1;
                let id = entity.id();
                if registry.container_of(id).await.is_some() {
                    continue;
                }
                match self.world.delete_instance(id).await {
                    Ok(()) => {
                        summary.deleted += 1;
                        tracing::info!(instance_id = %id, kind = %kind, "Deleted orphaned instance");
                    }
                    Err(e) => {
                        summary.failed += 1;
                        tracing::warn!(instance_id = %id, error = %e, "Failed to delete orphaned instance");
                    }
                }
            }
        }

        summary
    }
}
