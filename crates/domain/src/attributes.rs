//! Declared attribute schema per object kind.
//!
//! Every kind has a fixed list of settable attribute names. Each name has a
//! default used when no value is stored and an optional validator (see
//! [`crate::validate`]). Instances share their template's list and fall back to
//! the template before the default.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::validate;

pub const ATTR_TITLE: &str = "title";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_COLOR: &str = "color";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_PICTURE: &str = "picture";
pub const ATTR_PERMISSIONS: &str = "permissions";
pub const ATTR_CHANNELS: &str = "channels";
pub const ATTR_RARITY: &str = "rarity";
pub const ATTR_SCRIPT: &str = "script";

pub const TEMP_EDITOR_OPEN: &str = "editorOpen";
pub const TEMP_GHOST: &str = "ghost";
pub const TEMP_REPLY_TO: &str = "replyTo";

pub const SETTING_BRIEF: &str = "brief";

const AREA_ATTRIBUTES: &[&str] = &[];
const ROOM_ATTRIBUTES: &[&str] = &[
    ATTR_TITLE,
    ATTR_DESCRIPTION,
    ATTR_COLOR,
    ATTR_TYPE,
    "north",
    "south",
    "east",
    "west",
    "up",
    "down",
];
const CHARACTER_ATTRIBUTES: &[&str] = &[ATTR_PICTURE, ATTR_TITLE, ATTR_PERMISSIONS, ATTR_CHANNELS];
const ITEM_ATTRIBUTES: &[&str] = &[ATTR_PICTURE, ATTR_DESCRIPTION, ATTR_RARITY];
const MOB_ATTRIBUTES: &[&str] = &[ATTR_PICTURE, ATTR_SCRIPT, ATTR_DESCRIPTION];

/// A character setting: name, default, validator, description.
pub struct SettingDefinition {
    pub name: &'static str,
    pub default: &'static str,
    pub validator: &'static str,
    pub description: &'static str,
}

pub const SETTINGS: &[SettingDefinition] = &[SettingDefinition {
    name: SETTING_BRIEF,
    default: "false",
    validator: "bool",
    description: "Toggle short room descriptions when moving.",
}];

pub fn setting(name: &str) -> Option<&'static SettingDefinition> {
    SETTINGS.iter().find(|s| s.name == name)
}

/// Every kind of object that carries attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Area,
    Room,
    Character,
    Item,
    ItemInstance,
    Mob,
    MobInstance,
}

impl ObjectKind {
    /// The settable attribute names for this kind.
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            Self::Area => AREA_ATTRIBUTES,
            Self::Room => ROOM_ATTRIBUTES,
            Self::Character => CHARACTER_ATTRIBUTES,
            Self::Item | Self::ItemInstance => ITEM_ATTRIBUTES,
            Self::Mob | Self::MobInstance => MOB_ATTRIBUTES,
        }
    }

    pub fn is_declared(self, name: &str) -> bool {
        self.attributes().contains(&name)
    }

    pub fn default_value(self, name: &str) -> &'static str {
        match (self, name) {
            (Self::Room, ATTR_TITLE) => "Empty Room",
            (Self::Room, ATTR_DESCRIPTION) => {
                "You are in a newly created empty room. Make it a good one!"
            }
            (Self::Room, ATTR_COLOR) => "190,190,190",
            (Self::Item | Self::ItemInstance, ATTR_RARITY) => "0",
            _ => "",
        }
    }

    pub fn validator(self, name: &str) -> Option<&'static str> {
        match (self, name) {
            (Self::Item | Self::ItemInstance, ATTR_RARITY) => Some("num|min:0|max:4"),
            _ => None,
        }
    }

    /// The template kind an instance falls back to.
    pub fn template(self) -> Option<ObjectKind> {
        match self {
            Self::ItemInstance => Some(Self::Item),
            Self::MobInstance => Some(Self::Mob),
            _ => None,
        }
    }

    /// Checks that `value` may be stored under `name` for this kind.
    ///
    /// An empty value always passes: it clears the stored value.
    pub fn check(self, name: &str, value: &str) -> Result<(), DomainError> {
        if !self.is_declared(name) {
            return Err(DomainError::invalid_attribute(self, name));
        }
        if value.is_empty() {
            return Ok(());
        }
        if let Some(rules) = self.validator(name) {
            let result = validate::check(value, rules);
            if !result.passed() {
                return Err(DomainError::validation(result.to_string()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Area => "area",
            Self::Room => "room",
            Self::Character => "character",
            Self::Item => "item",
            Self::ItemInstance => "item instance",
            Self::Mob => "mob",
            Self::MobInstance => "mob instance",
        };
        write!(f, "{name}")
    }
}

/// Stored attribute values of one object.
///
/// Only non-empty values are kept; reading an absent name yields the fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMap(BTreeMap<String, String>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value, with no fallback.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The stored value or the kind's declared default.
    pub fn resolve(&self, kind: ObjectKind, name: &str) -> String {
        self.get(name)
            .unwrap_or_else(|| kind.default_value(name))
            .to_string()
    }

    /// Instance lookup: this map, then `template`, then the template kind's default.
    pub fn resolve_over(&self, template: &AttributeMap, kind: ObjectKind, name: &str) -> String {
        match self.get(name) {
            Some(value) => value.to_string(),
            None => template.resolve(kind.template().unwrap_or(kind), name),
        }
    }

    /// Validates and stores a value. An empty value removes the stored entry.
    ///
    /// On error the map is left unchanged.
    pub fn set(&mut self, kind: ObjectKind, name: &str, value: &str) -> Result<(), DomainError> {
        kind.check(name, value)?;
        if value.is_empty() {
            self.0.remove(name);
        } else {
            self.0.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_defaults_apply_when_unset() {
        let attrs = AttributeMap::new();
        assert_eq!(attrs.resolve(ObjectKind::Room, ATTR_TITLE), "Empty Room");
        assert_eq!(attrs.resolve(ObjectKind::Room, ATTR_COLOR), "190,190,190");
    }

    #[test]
    fn undeclared_name_is_rejected_and_map_unchanged() {
        let mut attrs = AttributeMap::new();
        attrs
            .set(ObjectKind::Item, ATTR_PICTURE, "sword.png")
            .expect("declared attribute");
        let before = attrs.clone();

        let err = attrs
            .set(ObjectKind::Item, "weight", "3")
            .expect_err("undeclared attribute");

        assert!(matches!(err, DomainError::InvalidAttribute { .. }));
        assert_eq!(attrs, before);
    }

    #[test]
    fn validator_failure_is_a_validation_error() {
        let mut attrs = AttributeMap::new();
        let err = attrs
            .set(ObjectKind::Item, ATTR_RARITY, "9")
            .expect_err("out of range");
        assert_eq!(err, DomainError::validation("greater than 4"));
        assert_eq!(attrs.get(ATTR_RARITY), None);
    }

    #[test]
    fn empty_value_clears_override() {
        let mut attrs = AttributeMap::new();
        attrs
            .set(ObjectKind::Room, ATTR_TITLE, "Town Square")
            .expect("set");
        attrs.set(ObjectKind::Room, ATTR_TITLE, "").expect("clear");
        assert_eq!(attrs.resolve(ObjectKind::Room, ATTR_TITLE), "Empty Room");
    }

    #[test]
    fn instance_falls_back_to_template_then_default() {
        let mut template = AttributeMap::new();
        template
            .set(ObjectKind::Item, ATTR_DESCRIPTION, "A rusty blade.")
            .expect("set");
        let mut instance = AttributeMap::new();

        let kind = ObjectKind::ItemInstance;
        assert_eq!(
            instance.resolve_over(&template, kind, ATTR_DESCRIPTION),
            "A rusty blade."
        );
        assert_eq!(instance.resolve_over(&template, kind, ATTR_RARITY), "0");

        instance
            .set(kind, ATTR_DESCRIPTION, "A gleaming blade.")
            .expect("set");
        assert_eq!(
            instance.resolve_over(&template, kind, ATTR_DESCRIPTION),
            "A gleaming blade."
        );
    }

    #[test]
    fn brief_setting_is_declared() {
        let brief = setting(SETTING_BRIEF).expect("declared");
        assert_eq!(brief.default, "false");
        assert!(setting("wrap").is_none());
    }
}
