//! Command tree definitions.
//!
//! A command is either a leaf bound to a handler or an internal node whose
//! subcommands are selected by the next token. Nodes carry their own argument
//! schema and predicate set.

use std::fmt;

use crate::entities::Character;

pub const CAN_BUILD: &str = "CAN_BUILD";
pub const CAN_CHAREDIT: &str = "CAN_CHAREDIT";
pub const CAN_GHOST: &str = "CAN_GHOST";
pub const CAN_SYSOP: &str = "CAN_SYSOP";

/// Which handler a leaf command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerId {
    Login,
    Logout,
    Look,
    Glance,
    Say,
    Whisper,
    Reply,
    Who,
    Move,
    Get,
    Drop,
    Inventory,
    Settings,
    Password,
    RoomSet,
    RoomCreate,
    RoomDestroy,
    AreaCreate,
    AreaList,
    ItemCreate,
    ItemList,
    ItemSpawn,
    ItemSet,
    ItemInstanceSet,
    ItemInstances,
    MobCreate,
    MobList,
    MobSpawn,
    MobSet,
    MobInstanceSet,
    MobInstances,
    Wipe,
    CharacterList,
    CharacterCreate,
    CharacterSet,
    Ghost,
    Save,
    Tickers,
    Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Pre-login commands.
    NoCharacter,
    Character,
    Permission(&'static str),
}

/// What the dispatcher knows about whoever issued a line.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub has_character: bool,
    pub permissions: Vec<String>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub async fn for_character(character: Option<&Character>) -> Self {
        match character {
            Some(character) => Self {
                has_character: true,
                permissions: character.permissions().await,
            },
            None => Self::anonymous(),
        }
    }

    pub fn satisfies(&self, predicate: Predicate) -> bool {
        match predicate {
            Predicate::NoCharacter => !self.has_character,
            Predicate::Character => self.has_character,
            Predicate::Permission(name) => {
                self.has_character && self.permissions.iter().any(|p| p == name)
            }
        }
    }
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argument {
    pub name: &'static str,
    pub required: bool,
    /// Consumes every remaining token, re-joined with single spaces.
    pub remaining: bool,
    /// Masked in command logs.
    pub no_log: bool,
}

impl Argument {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            remaining: false,
            no_log: false,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            remaining: false,
            no_log: false,
        }
    }

    pub const fn remaining(mut self) -> Self {
        self.remaining = true;
        self
    }

    pub const fn no_log(mut self) -> Self {
        self.no_log = true;
        self
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "<{}>", self.name)
        } else {
            write!(f, "[{}]", self.name)
        }
    }
}

// =============================================================================
// Command
// =============================================================================

#[derive(Debug, Clone)]
pub struct Command {
    pub name: &'static str,
    pub help: &'static str,
    pub alt_names: Vec<&'static str>,
    /// Literal rewrite target; the rest of the line is appended.
    pub alias: Option<&'static str>,
    pub predicates: Vec<Predicate>,
    pub arguments: Vec<Argument>,
    pub subcommands: Vec<Command>,
    pub handler: Option<HandlerId>,
}

impl Command {
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            alt_names: Vec::new(),
            alias: None,
            predicates: Vec::new(),
            arguments: Vec::new(),
            subcommands: Vec::new(),
            handler: None,
        }
    }

    /// A command that rewrites itself into `target` before parsing again.
    pub fn alias(name: &'static str, target: &'static str) -> Self {
        let mut command = Self::new(name, "");
        command.alias = Some(target);
        command
    }

    pub fn alt(mut self, name: &'static str) -> Self {
        self.alt_names.push(name);
        self
    }

    pub fn requires(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn require_character(self) -> Self {
        self.requires(Predicate::Character)
    }

    pub fn require_no_character(self) -> Self {
        self.requires(Predicate::NoCharacter)
    }

    pub fn require_permission(self, permission: &'static str) -> Self {
        self.requires(Predicate::Permission(permission))
    }

    pub fn arg(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn sub(mut self, command: Command) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn handler(mut self, handler: HandlerId) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Case-sensitive match against the name and alternate names.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.alt_names.iter().any(|alt| *alt == token)
    }

    pub fn is_permitted(&self, caller: &Caller) -> bool {
        self.predicates.iter().all(|p| caller.satisfies(*p))
    }

    /// `<required> [optional]` rendering of the argument schema.
    pub fn syntax(&self) -> String {
        self.arguments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
