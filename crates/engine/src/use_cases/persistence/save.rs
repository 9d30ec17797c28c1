//! Full-state save through the storage port.

use std::sync::Arc;

use serde::Serialize;

use mudhall_domain::ObjectContainer;

use crate::entities::{EntityKind, Template, TemplateFamily, World};
use crate::infrastructure::ports::{StorageError, StoragePort};

use super::records::*;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to serialize {file}: {source}")]
    Serialize {
        file: &'static str,
        source: serde_json::Error,
    },
}

pub struct SaveWorld {
    world: Arc<World>,
    storage: Arc<dyn StoragePort>,
}

impl SaveWorld {
    pub fn new(world: Arc<World>, storage: Arc<dyn StoragePort>) -> Self {
        Self { world, storage }
    }

    /// Writes every data file; returns the total byte count.
    pub async fn execute(&self) -> Result<usize, SaveError> {
        let mut total = self
            .write(
                SCHEMA_VERSION_FILE,
                "text/plain",
                CURRENT_SCHEMA_VERSION.to_string().into_bytes(),
            )
            .await?;

        let items = ItemsFile {
            items: template_records(self.world.items().await).await,
        };
        total += self.write_json(ITEMS_FILE, &items).await?;

        let mobs = MobsFile {
            mobs: template_records(self.world.mobs().await).await,
        };
        total += self.write_json(MOBS_FILE, &mobs).await?;

        let characters = self.character_records().await;
        total += self.write_json(CHARACTERS_FILE, &characters).await?;

        let world = self.world_records().await;
        total += self.write_json(WORLD_FILE, &world).await?;

        tracing::info!(bytes = total, "World saved");
        Ok(total)
    }

    async fn character_records(&self) -> CharactersFile {
        let mut characters = Vec::new();
        for character in self.world.characters().await {
            let state = character.lock().await;
            characters.push(CharacterRecord {
                id: character.id(),
                name: character.name().to_string(),
                password: state.password.clone(),
                attributes: state.attributes.clone(),
                settings: state.settings.clone(),
                inventory: state.inventory.clone(),
                location: state.location,
                last_seen: state.last_seen,
            });
        }
        CharactersFile { characters }
    }

    async fn world_records(&self) -> WorldFile {
        let mut areas = Vec::new();
        for area in self.world.areas().await {
            let mut rooms = Vec::new();
            for room in area.rooms().await {
                let state = room.snapshot().await;
                rooms.push(RoomRecord {
                    id: room.id(),
                    coords: room.coords(),
                    attributes: state.attributes,
                    here: self.persistent_contents(state.here).await,
                });
            }
            areas.push(AreaRecord {
                id: area.id(),
                name: area.name().await,
                attributes: area.attributes().await,
                rooms,
            });
        }
        WorldFile { areas }
    }

    /// Characters are placed on login, so only instances are written.
    async fn persistent_contents(&self, mut here: ObjectContainer) -> ObjectContainer {
        let mut keep = Vec::new();
        for id in here.ids() {
            if let Ok(entity) = self.world.registry().get(id).await {
                if matches!(
                    entity.kind(),
                    EntityKind::ItemInstance | EntityKind::MobInstance
                ) {
                    keep.push(id);
                }
            }
        }
        here.retain(|id| keep.contains(&id));
        here
    }

    async fn write_json<T: Serialize>(
        &self,
        file: &'static str,
        value: &T,
    ) -> Result<usize, SaveError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|source| SaveError::Serialize { file, source })?;
        self.write(file, "application/json", bytes).await
    }

    async fn write(
        &self,
        file: &'static str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<usize, SaveError> {
        let written = self.storage.write_file(file, content_type, bytes).await?;
        tracing::debug!(file = %file, bytes = written, "Saved data file");
        Ok(written)
    }
}

async fn template_records<F: TemplateFamily>(templates: Vec<Arc<Template<F>>>) -> Vec<TemplateRecord> {
    let mut records = Vec::new();
    for template in templates {
        let mut instances = Vec::new();
        for instance in template.instances().await {
            instances.push(InstanceRecord {
                id: instance.id().into(),
                attributes: instance.overrides().await,
            });
        }
        records.push(TemplateRecord {
            name: template.name().to_string(),
            attributes: template.attributes().await,
            instances,
        });
    }
    records
}
