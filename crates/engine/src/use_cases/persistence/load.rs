//! Boot-time load of the persisted world.
//!
//! Every failure here is fatal to startup.

use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use uuid::Uuid;

use mudhall_domain::DomainError;

use crate::entities::{
    Area, Character, CharacterState, ContainerOwner, Room, Template, TemplateFamily, World,
};
use crate::infrastructure::ports::{StorageError, StoragePort};

use super::records::*;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read data: {0}")]
    Storage(#[from] StorageError),
    #[error("{file} is corrupt: {message}")]
    Corrupt { file: &'static str, message: String },
    #[error("Schema version file holds '{0}', expected an integer")]
    InvalidSchemaVersion(String),
    #[error("Data schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: u32, supported: u32 },
    #[error("Data schema version {found} predates supported version {supported}")]
    SchemaTooOld { found: u32, supported: u32 },
    #[error("Inconsistent data: {0}")]
    Domain(#[from] DomainError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub areas: usize,
    pub rooms: usize,
    pub characters: usize,
    pub items: usize,
    pub mobs: usize,
    pub instances: usize,
    /// Container entries that referenced no live instance.
    pub dropped_entries: usize,
}

pub struct LoadWorld {
    world: Arc<World>,
    storage: Arc<dyn StoragePort>,
}

impl LoadWorld {
    pub fn new(world: Arc<World>, storage: Arc<dyn StoragePort>) -> Self {
        Self { world, storage }
    }

    pub async fn execute(&self) -> Result<LoadSummary, LoadError> {
        let mut summary = LoadSummary::default();

        // 1. Schema version
        self.check_schema_version().await?;

        // 2. Templates and their instances
        let items: ItemsFile = self.read_json(ITEMS_FILE).await?;
        let mobs: MobsFile = self.read_json(MOBS_FILE).await?;
        let mut item_ids = HashSet::new();
        let mut mob_ids = HashSet::new();
        for record in items.items {
            let template = self.restore_template(record, &mut item_ids).await;
            self.world.add_item(template).await?;
            summary.items += 1;
        }
        for record in mobs.mobs {
            let template = self.restore_template(record, &mut mob_ids).await;
            self.world.add_mob(template).await?;
            summary.mobs += 1;
        }
        summary.instances = item_ids.len() + mob_ids.len();
        let mut placed = HashSet::new();

        // 3. Characters; inventories only hold items
        let characters: CharactersFile = self.read_json(CHARACTERS_FILE).await?;
        for record in characters.characters {
            let mut inventory = record.inventory;
            let before = inventory.len();
            inventory.retain(|id| item_ids.contains(&id));
            summary.dropped_entries += before - inventory.len();

            let held: Vec<Uuid> = inventory.ids().collect();
            claim(&mut placed, &held)?;
            let character = Arc::new(Character::restore(
                record.id,
                record.name,
                CharacterState {
                    password: record.password,
                    attributes: record.attributes,
                    settings: record.settings,
                    temp: Default::default(),
                    inventory,
                    location: record.location,
                    last_seen: record.last_seen,
                    session: None,
                },
            ));
            self.world.add_character(Arc::clone(&character)).await?;
            for id in held {
                self.world
                    .registry()
                    .set_container(id, ContainerOwner::Character(character.id()))
                    .await;
            }
            summary.characters += 1;
        }

        // 4. Areas and rooms; rooms only hold item and mob instances
        let world: WorldFile = self.read_json(WORLD_FILE).await?;
        for record in world.areas {
            let area = Arc::new(Area::restore(record.id, record.name, record.attributes));
            for room_record in record.rooms {
                let mut here = room_record.here;
                let before = here.len();
                here.retain(|id| item_ids.contains(&id) || mob_ids.contains(&id));
                summary.dropped_entries += before - here.len();

                let held: Vec<Uuid> = here.ids().collect();
                claim(&mut placed, &held)?;
                let room = Arc::new(Room::restore(
                    room_record.id,
                    area.id(),
                    room_record.coords,
                    room_record.attributes,
                    here,
                ));
                area.add_room(Arc::clone(&room)).await?;
                for id in held {
                    self.world
                        .registry()
                        .set_container(id, ContainerOwner::Room(room.id()))
                        .await;
                }
                summary.rooms += 1;
            }
            self.world.add_area(area).await?;
            summary.areas += 1;
        }

        if summary.dropped_entries > 0 {
            tracing::warn!(
                dropped = summary.dropped_entries,
                "Dropped container entries with no matching instance"
            );
        }
        tracing::info!(?summary, "World loaded");
        Ok(summary)
    }

    async fn check_schema_version(&self) -> Result<(), LoadError> {
        let bytes = self.storage.read_file(SCHEMA_VERSION_FILE).await?;
        let text = String::from_utf8_lossy(&bytes).trim().to_string();
        let found: u32 = text
            .parse()
            .map_err(|_| LoadError::InvalidSchemaVersion(text.clone()))?;

        if found > CURRENT_SCHEMA_VERSION {
            return Err(LoadError::SchemaTooNew {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        if found < CURRENT_SCHEMA_VERSION {
            return Err(LoadError::SchemaTooOld {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, file: &'static str) -> Result<T, LoadError> {
        let bytes = self.storage.read_file(file).await?;
        serde_json::from_slice(&bytes).map_err(|e| LoadError::Corrupt {
            file,
            message: e.to_string(),
        })
    }

    async fn restore_template<F: TemplateFamily>(
        &self,
        record: TemplateRecord,
        ids: &mut HashSet<Uuid>,
    ) -> Arc<Template<F>> {
        let template = Template::<F>::new(record.name, record.attributes);
        for instance in record.instances {
            template
                .restore_instance(self.world.registry(), instance.id, instance.attributes)
                .await;
            ids.insert(instance.id);
        }
        template
    }
}

/// Records `ids` as placed; an instance held by two containers is corrupt data.
fn claim(placed: &mut HashSet<Uuid>, ids: &[Uuid]) -> Result<(), LoadError> {
    for id in ids {
        if !placed.insert(*id) {
            return Err(DomainError::duplicate(id.to_string()).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntityKind, Registry};
    use crate::infrastructure::ports::MockStoragePort;
    use std::collections::HashMap;

    fn storage_with(files: HashMap<&'static str, String>) -> Arc<dyn StoragePort> {
        let mut mock = MockStoragePort::new();
        mock.expect_read_file().returning(move |name| {
            files
                .get(name)
                .map(|s| s.clone().into_bytes())
                .ok_or_else(|| StorageError::NotFound(name.to_string()))
        });
        Arc::new(mock)
    }

    fn valid_files() -> HashMap<&'static str, String> {
        files_for(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    fn files_for(sword: Uuid, goblin: Uuid, area: Uuid) -> HashMap<&'static str, String> {
        HashMap::from([
            (SCHEMA_VERSION_FILE, "1\n".to_string()),
            (
                ITEMS_FILE,
                format!(r#"{{"items":[{{"name":"sword","attributes":{{"rarity":"2"}},"instances":[{{"id":"{sword}"}}]}}]}}"#),
            ),
            (
                MOBS_FILE,
                format!(r#"{{"mobs":[{{"name":"goblin","instances":[{{"id":"{goblin}"}}]}}]}}"#),
            ),
            (
                CHARACTERS_FILE,
                format!(
                    r#"{{"characters":[{{"id":"{}","name":"Bob","password":"x","location":{{"areaId":"{area}","coords":{{"x":0,"y":0,"z":0}}}}}}]}}"#,
                    Uuid::new_v4()
                ),
            ),
            (
                WORLD_FILE,
                format!(
                    r#"{{"areas":[{{"id":"{area}","name":"Limbo","rooms":[{{"id":"{}","coords":{{"x":0,"y":0,"z":0}},"here":{{"objects":[{{"id":"{sword}","slot":0}},{{"id":"{goblin}","slot":1}},{{"id":"{}","slot":2}}],"maxSize":0}}}}]}}]}}"#,
                    Uuid::new_v4(),
                    Uuid::new_v4()
                ),
            ),
        ])
    }

    #[tokio::test]
    async fn loads_world_and_drops_dangling_entries() {
        let world = Arc::new(World::new(Arc::new(Registry::new())));
        let load = LoadWorld::new(world.clone(), storage_with(valid_files()));

        let summary = load.execute().await.expect("load");

        assert_eq!(summary.areas, 1);
        assert_eq!(summary.rooms, 1);
        assert_eq!(summary.characters, 1);
        assert_eq!(summary.instances, 2);
        assert_eq!(summary.dropped_entries, 1);

        let area = world.area_by_name("limbo").await.expect("area");
        let room = area.rooms().await.pop().expect("room");
        assert_eq!(room.contents().await.len(), 2);
        for entity in world.registry().all_of_kind(EntityKind::ItemInstance).await {
            assert_eq!(
                world.registry().container_of(entity.id()).await,
                Some(ContainerOwner::Room(room.id()))
            );
        }
        assert!(world.character_by_name("bob").await.is_some());
    }

    #[tokio::test]
    async fn instance_in_two_containers_is_fatal() {
        let (sword, area) = (Uuid::new_v4(), Uuid::new_v4());
        let mut files = files_for(sword, Uuid::new_v4(), area);
        files.insert(
            CHARACTERS_FILE,
            format!(
                r#"{{"characters":[{{"id":"{}","name":"Bob","password":"x","inventory":{{"objects":[{{"id":"{sword}","slot":0}}],"maxSize":35}},"location":{{"areaId":"{area}","coords":{{"x":0,"y":0,"z":0}}}}}}]}}"#,
                Uuid::new_v4()
            ),
        );
        let world = Arc::new(World::new(Arc::new(Registry::new())));

        let err = LoadWorld::new(world, storage_with(files))
            .execute()
            .await
            .expect_err("sword is both carried and on the floor");

        assert!(matches!(err, LoadError::Domain(DomainError::Duplicate(id)) if id == sword.to_string()));
    }

    #[tokio::test]
    async fn newer_schema_is_fatal() {
        let mut files = valid_files();
        files.insert(SCHEMA_VERSION_FILE, "2".to_string());
        let world = Arc::new(World::new(Arc::new(Registry::new())));

        let err = LoadWorld::new(world, storage_with(files))
            .execute()
            .await
            .expect_err("downgrade");

        assert!(matches!(err, LoadError::SchemaTooNew { found: 2, supported: 1 }));
    }

    #[tokio::test]
    async fn missing_file_is_fatal() {
        let mut files = valid_files();
        files.remove(MOBS_FILE);
        let world = Arc::new(World::new(Arc::new(Registry::new())));

        let err = LoadWorld::new(world, storage_with(files))
            .execute()
            .await
            .expect_err("missing");

        assert!(matches!(err, LoadError::Storage(StorageError::NotFound(name)) if name == MOBS_FILE));
    }

    #[tokio::test]
    async fn corrupt_json_names_the_file() {
        let mut files = valid_files();
        files.insert(WORLD_FILE, "{\"areas\": [".to_string());
        let world = Arc::new(World::new(Arc::new(Registry::new())));

        let err = LoadWorld::new(world, storage_with(files))
            .execute()
            .await
            .expect_err("corrupt");

        assert!(matches!(err, LoadError::Corrupt { file: WORLD_FILE, .. }));
    }

    #[tokio::test]
    async fn garbage_schema_version_is_fatal() {
        let mut files = valid_files();
        files.insert(SCHEMA_VERSION_FILE, "one".to_string());
        let world = Arc::new(World::new(Arc::new(Registry::new())));

        let err = LoadWorld::new(world, storage_with(files))
            .execute()
            .await
            .expect_err("garbage");

        assert!(matches!(err, LoadError::InvalidSchemaVersion(v) if v == "one"));
    }
}
