//! Movement use cases.
//!
//! Every change of an object's container goes through here so room contents,
//! inventories and registry container associations stay consistent.

mod carry;
mod move_character;
mod transfer;

pub use carry::{DropItem, TakeItem};
pub use move_character::{MoveCharacter, MoveOutcome};
pub use transfer::{lock_pair, transfer_between_rooms, Transfer};

use std::sync::Arc;

use uuid::Uuid;

use mudhall_domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("Character is not in a room")]
    NoCurrentRoom,
    #[error("No exit in that direction")]
    NoExit,
    #[error("Exit is blocked")]
    Blocked(Option<String>),
    #[error("Object {0} is not in the source container")]
    NotInSource(Uuid),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Container for movement use cases.
pub struct MovementUseCases {
    pub move_character: Arc<MoveCharacter>,
    pub take_item: Arc<TakeItem>,
    pub drop_item: Arc<DropItem>,
}

impl MovementUseCases {
    pub fn new(
        move_character: Arc<MoveCharacter>,
        take_item: Arc<TakeItem>,
        drop_item: Arc<DropItem>,
    ) -> Self {
        Self {
            move_character,
            take_item,
            drop_item,
        }
    }
}
