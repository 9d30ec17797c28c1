use super::*;
use crate::entities::{Area, Entity, Exit, RoomRemoval};
use mudhall_domain::{AreaId, Coords, ExitTarget, RoomId};

pub(super) async fn handle_room_set(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };
    let name = ctx.required("name");
    let value = ctx.arg("value").unwrap_or_default();

    if name.parse::<Direction>().is_ok() {
        if let Err(e) = ExitTarget::parse(value) {
            return Some(format!("That isn't a valid exit: {e}"));
        }
    }
    if let Err(e) = room.set_attribute(name, value).await {
        return Some(describe(&e));
    }

    tracing::info!(
        character = %character.name(),
        room = %room.location(),
        attribute = %name,
        "Room attribute set"
    );
    app.sync.room_view(character, &room, true).await;
    Some(if value.is_empty() {
        format!("Cleared the room's {name}.")
    } else {
        format!("Set the room's {name} to '{value}'.")
    })
}

pub(super) async fn handle_room_create(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(direction) = parse_direction(ctx.required("direction")) else {
        return Some(INVALID_DIRECTION.to_string());
    };
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };
    let Some(area) = app.world.area(room.area_id()).await else {
        return Some(NOWHERE.to_string());
    };

    let already = format!("There is already a room {}.", direction.towards());
    if let Exit::Open(_) = app.world.connected_room(&room, direction).await {
        return Some(already);
    }
    let coords = room.coords().offset(direction.offset());
    if area.room_at(coords).await.is_some() {
        return Some(already);
    }

    let created = Arc::new(Room::new(RoomId::new(), area.id(), coords));
    if let Err(e) = app.world.add_room(&area, created).await {
        return Some(describe(&e));
    }

    tracing::info!(character = %character.name(), area = %area.id(), coords = %coords, "Room created");
    app.sync.room_view(character, &room, true).await;
    Some(format!("You create a room {}.", direction.towards()))
}

pub(super) async fn handle_room_destroy(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(direction) = parse_direction(ctx.required("direction")) else {
        return Some(INVALID_DIRECTION.to_string());
    };
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };
    let Some(area) = app.world.area(room.area_id()).await else {
        return Some(NOWHERE.to_string());
    };
    let Some(target) = area.room_at(room.coords().offset(direction.offset())).await else {
        return Some(format!("There is no room {}.", direction.towards()));
    };

    match app.world.remove_vacant_room(&area, &target).await {
        RoomRemoval::Removed => {}
        RoomRemoval::NotFound => return Some(format!("There is no room {}.", direction.towards())),
        RoomRemoval::NotEmpty => return Some("That room is not empty.".to_string()),
        RoomRemoval::HomeOf(name) => return Some(format!("{name} lives in that room.")),
    }

    tracing::info!(
        character = %character.name(),
        room = %target.location(),
        "Room destroyed"
    );
    app.sync.room_view(character, &room, true).await;
    Some(format!("You destroy the room {}.", direction.towards()))
}

pub(super) async fn handle_area_create(app: &App, ctx: &CommandContext) -> Option<String> {
    let name = ctx.required("name");
    if app.world.area_by_name(name).await.is_some() {
        return Some(format!("An area named '{name}' already exists."));
    }

    let area = Arc::new(Area::new(AreaId::new(), name));
    let origin = Arc::new(Room::new(RoomId::new(), area.id(), Coords::new(0, 0, 0)));
    if let Err(e) = area.add_room(origin).await {
        return Some(describe(&e));
    }
    match app.world.add_area(area).await {
        Ok(()) => {
            tracing::info!(area = %name, "Area created");
            Some(format!("Area '{name}' created with an origin room."))
        }
        Err(DomainError::Duplicate(_)) => Some(format!("An area named '{name}' already exists.")),
        Err(e) => Some(describe(&e)),
    }
}

pub(super) async fn handle_area_list(app: &App) -> Option<String> {
    let areas = app.world.areas().await;
    if areas.is_empty() {
        return Some("There are no areas.".to_string());
    }
    let mut text = String::from("Areas:");
    for area in areas {
        text.push_str(&format!(
            "\n  {} ({} rooms)",
            area.name().await,
            area.rooms().await.len()
        ));
    }
    Some(text)
}

pub(super) async fn handle_wipe(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };

    let mut wiped = 0;
    for id in room.contents().await {
        match app.world.registry().get(id).await {
            Ok(Entity::ItemInstance(_)) | Ok(Entity::MobInstance(_)) => {}
            _ => continue,
        }
        room.remove_object(id).await;
        app.world.registry().clear_container(id).await;
        match app.world.delete_instance(id).await {
            Ok(()) => wiped += 1,
            Err(e) => tracing::warn!(instance_id = %id, error = %e, "Wipe could not delete instance"),
        }
    }

    app.events.refresh(&room).await;
    Some(match wiped {
        0 => "There is nothing here to wipe.".to_string(),
        1 => "Wiped 1 object.".to_string(),
        n => format!("Wiped {n} objects."),
    })
}
