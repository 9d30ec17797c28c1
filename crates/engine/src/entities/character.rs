//! Player characters.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};

use mudhall_domain::attributes::{self, ATTR_PERMISSIONS};
use mudhall_domain::{
    validate, AttributeMap, CharacterId, DomainError, Location, ObjectContainer, ObjectKind,
};
use mudhall_shared::ServerMessage;

use crate::infrastructure::password;
use crate::stores::{SendError, Session};

/// Inventory slots per character.
pub const INVENTORY_SIZE: u32 = 35;

/// Mutable character state, guarded by the character's own lock.
pub struct CharacterState {
    /// Argon2 PHC string.
    pub password: String,
    pub attributes: AttributeMap,
    pub settings: BTreeMap<String, String>,
    /// Session-scoped values, cleared on logout and never persisted.
    pub temp: HashMap<String, String>,
    pub inventory: ObjectContainer,
    pub location: Location,
    pub last_seen: Option<DateTime<Utc>>,
    pub session: Option<Arc<Session>>,
}

pub struct Character {
    id: CharacterId,
    name: String,
    state: Mutex<CharacterState>,
}

impl Character {
    pub fn new(
        id: CharacterId,
        name: impl Into<String>,
        password: impl Into<String>,
        location: Location,
    ) -> Self {
        Self::restore(
            id,
            name,
            CharacterState {
                password: password.into(),
                attributes: AttributeMap::new(),
                settings: BTreeMap::new(),
                temp: HashMap::new(),
                inventory: ObjectContainer::new(INVENTORY_SIZE),
                location,
                last_seen: None,
                session: None,
            },
        )
    }

    pub fn restore(id: CharacterId, name: impl Into<String>, state: CharacterState) -> Self {
        Self {
            id,
            name: name.into(),
            state: Mutex::new(state),
        }
    }

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locks the character for a multi-step mutation. Take room locks first.
    pub async fn lock(&self) -> MutexGuard<'_, CharacterState> {
        self.state.lock().await
    }

    // =========================================================================
    // Session attachment
    // =========================================================================

    /// Attaches `session` unless another session already owns the character.
    pub async fn attach_session(&self, session: Arc<Session>) -> bool {
        let mut state = self.state.lock().await;
        if state.session.is_some() {
            return false;
        }
        state.session = Some(session);
        true
    }

    /// Detaches the session and clears temp attributes.
    pub async fn detach_session(&self, now: DateTime<Utc>) -> Option<Arc<Session>> {
        let mut state = self.state.lock().await;
        state.temp.clear();
        state.last_seen = Some(now);
        state.session.take()
    }

    pub async fn session(&self) -> Option<Arc<Session>> {
        self.state.lock().await.session.clone()
    }

    pub async fn is_online(&self) -> bool {
        self.state.lock().await.session.is_some()
    }

    /// Sends to the attached session, if any.
    pub async fn notify(&self, message: ServerMessage) -> Result<(), SendError> {
        match self.session().await {
            Some(session) => session.send(message),
            None => Err(SendError::Closed),
        }
    }

    pub async fn show_text(&self, text: impl Into<String>) {
        let _ = self.notify(ServerMessage::text(text)).await;
    }

    // =========================================================================
    // Location
    // =========================================================================

    pub async fn location(&self) -> Location {
        self.state.lock().await.location
    }

    pub async fn set_location(&self, location: Location) {
        self.state.lock().await.location = location;
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub async fn attribute(&self, name: &str) -> String {
        self.state
            .lock()
            .await
            .attributes
            .resolve(ObjectKind::Character, name)
    }

    pub async fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomainError> {
        self.state
            .lock()
            .await
            .attributes
            .set(ObjectKind::Character, name, value)
    }

    pub async fn permissions(&self) -> Vec<String> {
        self.attribute(ATTR_PERMISSIONS)
            .await
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub async fn has_permission(&self, permission: &str) -> bool {
        self.attribute(ATTR_PERMISSIONS)
            .await
            .split_whitespace()
            .any(|p| p == permission)
    }

    /// Stored setting or the declared default.
    pub async fn setting(&self, name: &str) -> Option<String> {
        let definition = attributes::setting(name)?;
        let state = self.state.lock().await;
        Some(
            state
                .settings
                .get(name)
                .cloned()
                .unwrap_or_else(|| definition.default.to_string()),
        )
    }

    pub async fn set_setting(&self, name: &str, value: &str) -> Result<(), DomainError> {
        let definition = attributes::setting(name)
            .ok_or_else(|| DomainError::not_found("setting", name))?;
        let result = validate::check(value, definition.validator);
        if !result.passed() {
            return Err(DomainError::validation(result.to_string()));
        }
        self.state
            .lock()
            .await
            .settings
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub async fn temp(&self, name: &str) -> Option<String> {
        self.state.lock().await.temp.get(name).cloned()
    }

    pub async fn set_temp(&self, name: &str, value: Option<String>) {
        let mut state = self.state.lock().await;
        match value {
            Some(value) => state.temp.insert(name.to_string(), value),
            None => state.temp.remove(name),
        };
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Verifies off the async workers; the hash is copied out first so the
    /// character lock is not held while hashing.
    pub async fn check_password(&self, candidate: &str) -> bool {
        let stored = self.state.lock().await.password.clone();
        let candidate = candidate.to_string();
        match tokio::task::spawn_blocking(move || password::verify_password(&stored, &candidate))
            .await
        {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(error = %e, character = %self.name, "Password check task failed");
                false
            }
        }
    }

    pub async fn set_password_hash(&self, phc: String) {
        self.state.lock().await.password = phc;
    }

    pub async fn inventory(&self) -> ObjectContainer {
        self.state.lock().await.inventory.clone()
    }
}
