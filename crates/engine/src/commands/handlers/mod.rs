//! Command handlers.
//!
//! Each handler returns the text to show the issuing session, if any. Extra
//! output (sync payloads, room notifications) is sent directly.

use std::sync::Arc;

use mudhall_domain::{Direction, DomainError};
use mudhall_shared::ServerMessage;

use super::{CommandContext, HandlerId};
use crate::app::App;
use crate::entities::{Character, ContainerOwner, ItemFamily, ItemInstance, MobFamily, Room};

mod cmd_account;
mod cmd_admin;
mod cmd_building;
mod cmd_chat;
mod cmd_look;
mod cmd_movement;
mod cmd_templates;

/// Runs the handler for one resolved command.
pub(super) async fn run(app: &App, ctx: &CommandContext, handler: HandlerId) -> Option<String> {
    match handler {
        // Account
        HandlerId::Login => cmd_account::handle_login(app, ctx).await,
        HandlerId::Logout => cmd_account::handle_logout(app, ctx).await,
        HandlerId::Password => cmd_account::handle_password(ctx).await,
        HandlerId::Settings => cmd_account::handle_settings(ctx).await,

        // Looking around
        HandlerId::Look => cmd_look::handle_look(app, ctx).await,
        HandlerId::Glance => cmd_look::handle_glance(app, ctx).await,
        HandlerId::Who => cmd_look::handle_who(app).await,
        HandlerId::Commands => cmd_look::handle_commands(app, ctx),

        // Communication
        HandlerId::Say => cmd_chat::handle_say(app, ctx).await,
        HandlerId::Whisper => cmd_chat::handle_whisper(app, ctx).await,
        HandlerId::Reply => cmd_chat::handle_reply(app, ctx).await,

        // Movement and items
        HandlerId::Move => cmd_movement::handle_move(app, ctx).await,
        HandlerId::Get => cmd_movement::handle_get(app, ctx).await,
        HandlerId::Drop => cmd_movement::handle_drop(app, ctx).await,
        HandlerId::Inventory => cmd_movement::handle_inventory(app, ctx).await,

        // Building
        HandlerId::RoomSet => cmd_building::handle_room_set(app, ctx).await,
        HandlerId::RoomCreate => cmd_building::handle_room_create(app, ctx).await,
        HandlerId::RoomDestroy => cmd_building::handle_room_destroy(app, ctx).await,
        HandlerId::AreaCreate => cmd_building::handle_area_create(app, ctx).await,
        HandlerId::AreaList => cmd_building::handle_area_list(app).await,
        HandlerId::Wipe => cmd_building::handle_wipe(app, ctx).await,

        // Templates
        HandlerId::ItemCreate => cmd_templates::handle_create::<ItemFamily>(app, ctx).await,
        HandlerId::ItemList => cmd_templates::handle_list::<ItemFamily>(app).await,
        HandlerId::ItemSpawn => cmd_templates::handle_spawn::<ItemFamily>(app, ctx).await,
        HandlerId::ItemSet => cmd_templates::handle_set::<ItemFamily>(app, ctx).await,
        HandlerId::ItemInstanceSet => {
            cmd_templates::handle_instance_set::<ItemFamily>(app, ctx).await
        }
        HandlerId::ItemInstances => cmd_templates::handle_instances::<ItemFamily>(app, ctx).await,
        HandlerId::MobCreate => cmd_templates::handle_create::<MobFamily>(app, ctx).await,
        HandlerId::MobList => cmd_templates::handle_list::<MobFamily>(app).await,
        HandlerId::MobSpawn => cmd_templates::handle_spawn::<MobFamily>(app, ctx).await,
        HandlerId::MobSet => cmd_templates::handle_set::<MobFamily>(app, ctx).await,
        HandlerId::MobInstanceSet => cmd_templates::handle_instance_set::<MobFamily>(app, ctx).await,
        HandlerId::MobInstances => cmd_templates::handle_instances::<MobFamily>(app, ctx).await,

        // Administration
        HandlerId::CharacterList => cmd_admin::handle_character_list(app, ctx).await,
        HandlerId::CharacterCreate => cmd_admin::handle_character_create(app, ctx).await,
        HandlerId::CharacterSet => cmd_admin::handle_character_set(app, ctx).await,
        HandlerId::Ghost => cmd_admin::handle_ghost(ctx).await,
        HandlerId::Save => cmd_admin::handle_save(app).await,
        HandlerId::Tickers => cmd_admin::handle_tickers(app).await,
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Every character command carries a character; the predicate guarantees it.
fn actor(ctx: &CommandContext) -> Option<&Arc<Character>> {
    ctx.character.as_ref()
}

async fn current_room(app: &App, character: &Character) -> Option<Arc<Room>> {
    app.world.room_for(character.location().await).await
}

const NOWHERE: &str = "You are nowhere. Contact an administrator.";
const INVALID_DIRECTION: &str = "That's not a valid direction.";

fn parse_direction(raw: &str) -> Option<Direction> {
    raw.parse().ok()
}

/// User-facing text for a failed attribute or container operation.
fn describe(error: &DomainError) -> String {
    match error {
        DomainError::InvalidAttribute { kind, name } => {
            format!("'{name}' is not a {kind} attribute.")
        }
        DomainError::Validation(reason) => format!("Invalid value: {reason}."),
        DomainError::ContainerFull { .. } => "There's no room for that.".to_string(),
        DomainError::Duplicate(name) => format!("'{name}' already exists."),
        DomainError::NotFound { entity_type, id } => format!("No {entity_type} '{id}'."),
        other => other.to_string(),
    }
}

/// First item on the room floor whose template name matches.
async fn find_on_floor(app: &App, room: &Room, name: &str) -> Option<Arc<ItemInstance>> {
    app.world
        .items_in(room)
        .await
        .into_iter()
        .find(|item| item.template_name().eq_ignore_ascii_case(name))
}

/// First carried item whose template name matches.
async fn find_carried(app: &App, character: &Character, name: &str) -> Option<Arc<ItemInstance>> {
    for id in character.inventory().await.ids() {
        if let Ok(item) = app.world.registry().item_instance(id).await {
            if item.template_name().eq_ignore_ascii_case(name) {
                return Some(item);
            }
        }
    }
    None
}

/// `a, b and c`
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}

async fn send_permissions(character: &Character) {
    let _ = character
        .notify(ServerMessage::SyncPermissions(character.permissions().await))
        .await;
}
