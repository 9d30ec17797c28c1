use super::*;
use crate::use_cases::movement::MoveError;

const CANT_MOVE: &str = "You can't move in that direction.";

pub(super) async fn handle_move(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(direction) = parse_direction(ctx.required("direction")) else {
        return Some(INVALID_DIRECTION.to_string());
    };

    match app
        .use_cases
        .movement
        .move_character
        .execute(character, direction)
        .await
    {
        Ok(outcome) => {
            character
                .show_text(format!("You walk {}.", direction.towards()))
                .await;
            let area_changed = outcome.from.area_id() != outcome.to.area_id();
            app.sync
                .room_view(character, &outcome.to, area_changed)
                .await;
            Some(super::cmd_look::arrival_view(app, character, &outcome.to).await)
        }
        Err(MoveError::NoExit) | Err(MoveError::Blocked(None)) => Some(CANT_MOVE.to_string()),
        Err(MoveError::Blocked(Some(message))) if message.is_empty() => {
            Some(CANT_MOVE.to_string())
        }
        Err(MoveError::Blocked(Some(message))) => Some(message),
        Err(MoveError::NoCurrentRoom) => Some(NOWHERE.to_string()),
        Err(MoveError::Domain(DomainError::ContainerFull { .. })) => {
            Some("There's no room for you there.".to_string())
        }
        Err(e) => {
            tracing::warn!(
                character = %character.name(),
                direction = %direction,
                error = %e,
                "Move failed"
            );
            Some(CANT_MOVE.to_string())
        }
    }
}

pub(super) async fn handle_get(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };
    let Some(item) = find_on_floor(app, &room, ctx.required("item")).await else {
        return Some("You don't see that here.".to_string());
    };
    let name = item.template_name();

    match app
        .use_cases
        .movement
        .take_item
        .execute(character, item.id().to_uuid())
        .await
    {
        Ok(()) => {
            app.sync.send_inventory(character).await;
            app.events
                .announce(
                    &room,
                    Some(character.id()),
                    &format!("{} picks up the {}.", character.name(), name),
                )
                .await;
            Some(format!("You pick up the {name}."))
        }
        Err(MoveError::Domain(DomainError::ContainerFull { .. })) => {
            Some("You can't carry any more.".to_string())
        }
        Err(MoveError::NotInSource(_)) => Some("You don't see that here.".to_string()),
        Err(e) => {
            tracing::warn!(character = %character.name(), item = %name, error = %e, "Get failed");
            Some(format!("You can't pick up the {name}."))
        }
    }
}

pub(super) async fn handle_drop(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };
    let Some(item) = find_carried(app, character, ctx.required("item")).await else {
        return Some("You aren't carrying that.".to_string());
    };
    let name = item.template_name();

    match app
        .use_cases
        .movement
        .drop_item
        .execute(character, item.id().to_uuid())
        .await
    {
        Ok(()) => {
            app.sync.send_inventory(character).await;
            app.events
                .announce(
                    &room,
                    Some(character.id()),
                    &format!("{} drops the {}.", character.name(), name),
                )
                .await;
            Some(format!("You drop the {name}."))
        }
        Err(MoveError::NotInSource(_)) => Some("You aren't carrying that.".to_string()),
        Err(e) => {
            tracing::warn!(character = %character.name(), item = %name, error = %e, "Drop failed");
            Some(format!("You can't drop the {name}."))
        }
    }
}

pub(super) async fn handle_inventory(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let entries = app.sync.inventory(character).await;
    app.sync.send_inventory(character).await;

    if entries.is_empty() {
        return Some("You aren't carrying anything.".to_string());
    }
    let mut text = String::from("You are carrying:");
    for entry in entries {
        text.push_str(&format!("\n  {}", entry.name));
    }
    Some(text)
}
