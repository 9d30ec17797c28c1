//! Item and mob templates with their live instances.
//!
//! Item and mob behave identically apart from their attribute schema and the
//! registry variant their instances use, so both are one generic type keyed by
//! a family marker.

use std::fmt;
use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use mudhall_domain::{AttributeMap, DomainError, ItemInstanceId, MobInstanceId, ObjectKind};

use super::registry::{ContainerOwner, Entity, Registry};
use super::{Room, World};

pub trait TemplateFamily: Send + Sync + Sized + 'static {
    type InstanceId: Copy + Eq + fmt::Display + From<Uuid> + Into<Uuid> + Send + Sync;

    const TEMPLATE_KIND: ObjectKind;
    const INSTANCE_KIND: ObjectKind;
    /// Lowercase noun used in messages.
    const LABEL: &'static str;

    fn entity(instance: Arc<Instance<Self>>) -> Entity;

    fn instance(entity: Entity) -> Option<Arc<Instance<Self>>>;

    /// The world's template list for this family.
    fn list(world: &World) -> &TemplateList<Self>;
}

pub struct ItemFamily;
pub struct MobFamily;

impl TemplateFamily for ItemFamily {
    type InstanceId = ItemInstanceId;
    const TEMPLATE_KIND: ObjectKind = ObjectKind::Item;
    const INSTANCE_KIND: ObjectKind = ObjectKind::ItemInstance;
    const LABEL: &'static str = "item";

    fn entity(instance: Arc<Instance<Self>>) -> Entity {
        Entity::ItemInstance(instance)
    }

    fn instance(entity: Entity) -> Option<Arc<Instance<Self>>> {
        match entity {
            Entity::ItemInstance(instance) => Some(instance),
            _ => None,
        }
    }

    fn list(world: &World) -> &TemplateList<Self> {
        &world.items
    }
}

impl TemplateFamily for MobFamily {
    type InstanceId = MobInstanceId;
    const TEMPLATE_KIND: ObjectKind = ObjectKind::Mob;
    const INSTANCE_KIND: ObjectKind = ObjectKind::MobInstance;
    const LABEL: &'static str = "mob";

    fn entity(instance: Arc<Instance<Self>>) -> Entity {
        Entity::MobInstance(instance)
    }

    fn instance(entity: Entity) -> Option<Arc<Instance<Self>>> {
        match entity {
            Entity::MobInstance(instance) => Some(instance),
            _ => None,
        }
    }

    fn list(world: &World) -> &TemplateList<Self> {
        &world.mobs
    }
}

pub type Item = Template<ItemFamily>;
pub type ItemInstance = Instance<ItemFamily>;
pub type Mob = Template<MobFamily>;
pub type MobInstance = Instance<MobFamily>;

// =============================================================================
// Template list
// =============================================================================

/// Templates of one family, unique by case-insensitive name.
pub struct TemplateList<F: TemplateFamily> {
    templates: RwLock<Vec<Arc<Template<F>>>>,
}

impl<F: TemplateFamily> TemplateList<F> {
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(Vec::new()),
        }
    }

    pub async fn add(&self, template: Arc<Template<F>>) -> Result<(), DomainError> {
        let mut templates = self.templates.write().await;
        if templates
            .iter()
            .any(|t| t.name().eq_ignore_ascii_case(template.name()))
        {
            return Err(DomainError::duplicate(template.name()));
        }
        templates.push(template);
        Ok(())
    }

    pub async fn all(&self) -> Vec<Arc<Template<F>>> {
        self.templates.read().await.clone()
    }

    pub async fn by_name(&self, name: &str) -> Option<Arc<Template<F>>> {
        self.templates
            .read()
            .await
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .cloned()
    }
}

impl<F: TemplateFamily> Default for TemplateList<F> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Template
// =============================================================================

struct TemplateState<F: TemplateFamily> {
    attributes: AttributeMap,
    instances: Vec<Arc<Instance<F>>>,
}

/// A reusable definition, identified by its unique name.
pub struct Template<F: TemplateFamily> {
    name: String,
    state: Mutex<TemplateState<F>>,
}

impl<F: TemplateFamily> Template<F> {
    pub fn new(name: impl Into<String>, attributes: AttributeMap) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            state: Mutex::new(TemplateState {
                attributes,
                instances: Vec::new(),
            }),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn attributes(&self) -> AttributeMap {
        self.state.lock().await.attributes.clone()
    }

    pub async fn attribute(&self, name: &str) -> String {
        self.state
            .lock()
            .await
            .attributes
            .resolve(F::TEMPLATE_KIND, name)
    }

    pub async fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomainError> {
        self.state
            .lock()
            .await
            .attributes
            .set(F::TEMPLATE_KIND, name, value)
    }

    pub async fn instances(&self) -> Vec<Arc<Instance<F>>> {
        self.state.lock().await.instances.clone()
    }

    /// Creates and registers a new instance. Placing it is the caller's job.
    pub async fn create_instance(self: &Arc<Self>, registry: &Registry) -> Arc<Instance<F>> {
        self.restore_instance(registry, Uuid::new_v4(), AttributeMap::new())
            .await
    }

    /// Creates an instance on the floor of `room`.
    ///
    /// The floor entry and the container association exist before the
    /// instance is registered, so the orphan sweep never sees it uncontained.
    pub async fn create_instance_in(
        self: &Arc<Self>,
        registry: &Registry,
        room: &Room,
    ) -> Result<Arc<Instance<F>>, DomainError> {
        let id = Uuid::new_v4();
        let mut floor = room.lock().await;
        if floor.removed {
            return Err(DomainError::not_found("room", room.id().to_string()));
        }
        floor.here.add(id)?;
        registry.set_container(id, ContainerOwner::Room(room.id())).await;
        Ok(self.restore_instance(registry, id, AttributeMap::new()).await)
    }

    /// Recreates a persisted instance and registers it.
    pub async fn restore_instance(
        self: &Arc<Self>,
        registry: &Registry,
        id: Uuid,
        attributes: AttributeMap,
    ) -> Arc<Instance<F>> {
        let instance = Arc::new(Instance {
            id: F::InstanceId::from(id),
            template_name: self.name.clone(),
            template: Arc::downgrade(self),
            attributes: Mutex::new(attributes),
        });
        self.state.lock().await.instances.push(Arc::clone(&instance));
        registry.register(F::entity(Arc::clone(&instance))).await;
        instance
    }

    /// Removes the instance from this template and the registry.
    pub async fn delete_instance(
        &self,
        registry: &Registry,
        id: F::InstanceId,
    ) -> Result<(), DomainError> {
        let removed = {
            let mut state = self.state.lock().await;
            let before = state.instances.len();
            state.instances.retain(|i| i.id != id);
            state.instances.len() != before
        };
        if !removed {
            return Err(DomainError::not_found(F::LABEL, id.to_string()));
        }
        registry.unregister(id.into()).await;
        Ok(())
    }
}

// =============================================================================
// Instance
// =============================================================================

/// A placed occurrence of a template.
pub struct Instance<F: TemplateFamily> {
    id: F::InstanceId,
    template_name: String,
    template: Weak<Template<F>>,
    attributes: Mutex<AttributeMap>,
}

impl<F: TemplateFamily> Instance<F> {
    #[inline]
    pub fn id(&self) -> F::InstanceId {
        self.id
    }

    #[inline]
    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn template(&self) -> Option<Arc<Template<F>>> {
        self.template.upgrade()
    }

    pub async fn overrides(&self) -> AttributeMap {
        self.attributes.lock().await.clone()
    }

    /// Instance override, then template value, then declared default.
    pub async fn attribute(&self, name: &str) -> String {
        let overrides = self.attributes.lock().await.clone();
        let template = match self.template() {
            Some(template) => template.attributes().await,
            None => AttributeMap::new(),
        };
        overrides.resolve_over(&template, F::INSTANCE_KIND, name)
    }

    pub async fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomainError> {
        self.attributes
            .lock()
            .await
            .set(F::INSTANCE_KIND, name, value)
    }
}
