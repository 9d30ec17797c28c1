//! Unified error types for the domain layer
//!
//! Every fallible domain operation returns `DomainError`; nothing in this crate
//! terminates the process on bad input.

use thiserror::Error;

use crate::attributes::ObjectKind;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed its attribute validator
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Business rule violation
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Attribute name is not declared for the object kind
    #[error("Invalid attribute '{name}' for {kind}")]
    InvalidAttribute { kind: ObjectKind, name: String },

    /// Container is at capacity
    #[error("Container full: {current}/{max} items")]
    ContainerFull { current: u32, max: u32 },

    /// Object is already held by the container
    #[error("Object {0} is already in the container")]
    Duplicate(String),
}

impl DomainError {
    /// Creates a validation error for a value rejected by an attribute validator.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for Direction {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "north" => Ok(Self::North),
    ///             _ => Err(DomainError::parse(format!("Unknown direction: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid attribute error
    pub fn invalid_attribute(kind: ObjectKind, name: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            kind,
            name: name.into(),
        }
    }

    /// Create a container full error
    pub fn container_full(current: u32, max: u32) -> Self {
        Self::ContainerFull { current, max }
    }

    /// Create a duplicate container entry error
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::Duplicate(id.into())
    }
}
