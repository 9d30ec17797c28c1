use super::*;
use mudhall_domain::attributes::{ATTR_DESCRIPTION, ATTR_TITLE, SETTING_BRIEF, TEMP_GHOST};

/// Full room text: title, description, exits and who else is here.
pub(super) async fn describe_room(app: &App, viewer: &Character, room: &Room) -> String {
    let mut text = format!(
        "{}\n{}\n{}",
        room.attribute(ATTR_TITLE).await,
        room.attribute(ATTR_DESCRIPTION).await,
        exits_line(&app.world.exits(room).await)
    );
    let others = others_here(app, viewer, room).await;
    if !others.is_empty() {
        text.push_str(&format!("\nAlso here: {}.", join_names(&others)));
    }
    text
}

/// What a character sees on arrival; the title and exits only with `brief`.
pub(super) async fn arrival_view(app: &App, viewer: &Character, room: &Room) -> String {
    if viewer.setting(SETTING_BRIEF).await.as_deref() == Some("true") {
        format!(
            "{}\n{}",
            room.attribute(ATTR_TITLE).await,
            exits_line(&app.world.exits(room).await)
        )
    } else {
        describe_room(app, viewer, room).await
    }
}

fn exits_line(exits: &[Direction]) -> String {
    if exits.is_empty() {
        return "There are no obvious exits.".to_string();
    }
    let names: Vec<String> = exits.iter().map(|d| d.as_str().to_string()).collect();
    format!("Exits: {}.", join_names(&names))
}

/// Visible characters, then mobs, then items. Ghosts are not listed.
async fn others_here(app: &App, viewer: &Character, room: &Room) -> Vec<String> {
    let mut names = Vec::new();
    for occupant in app.world.occupants(room, Some(viewer.id())).await {
        if occupant.temp(TEMP_GHOST).await.is_none() {
            names.push(occupant.name().to_string());
        }
    }
    for mob in app.world.mobs_in(room).await {
        names.push(mob.template_name().to_string());
    }
    for item in app.world.items_in(room).await {
        names.push(item.template_name().to_string());
    }
    names
}

pub(super) async fn handle_look(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };

    let Some(target) = ctx.arg("at") else {
        app.sync.room_view(character, &room, false).await;
        return Some(describe_room(app, character, &room).await);
    };

    Some(
        look_at(app, character, &room, target)
            .await
            .unwrap_or_else(|| "You don't see that here.".to_string()),
    )
}

async fn look_at(app: &App, viewer: &Character, room: &Room, target: &str) -> Option<String> {
    for occupant in app.world.occupants(room, None).await {
        if occupant.name().eq_ignore_ascii_case(target) {
            if occupant.id() == viewer.id() {
                return Some("You look yourself over. Looking good.".to_string());
            }
            let title = occupant.attribute(ATTR_TITLE).await;
            return Some(if title.is_empty() {
                format!("You see {}.", occupant.name())
            } else {
                format!("You see {}, {}.", occupant.name(), title)
            });
        }
    }

    for mob in app.world.mobs_in(room).await {
        if mob.template_name().eq_ignore_ascii_case(target) {
            return Some(described(mob.template_name(), mob.attribute(ATTR_DESCRIPTION).await));
        }
    }

    let item = match find_on_floor(app, room, target).await {
        Some(item) => Some(item),
        None => find_carried(app, viewer, target).await,
    }?;
    Some(described(item.template_name(), item.attribute(ATTR_DESCRIPTION).await))
}

fn described(name: &str, description: String) -> String {
    if description.is_empty() {
        format!("You see nothing special about the {name}.")
    } else {
        description
    }
}

pub(super) async fn handle_glance(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };

    let exits: Vec<&str> = app
        .world
        .exits(&room)
        .await
        .into_iter()
        .map(Direction::as_str)
        .collect();
    let mut text = format!(
        "{} [exits: {}]",
        room.attribute(ATTR_TITLE).await,
        if exits.is_empty() {
            "none".to_string()
        } else {
            exits.join(", ")
        }
    );
    let others = others_here(app, character, &room).await;
    if !others.is_empty() {
        text.push_str(&format!(" Here: {}.", join_names(&others)));
    }
    Some(text)
}

pub(super) async fn handle_who(app: &App) -> Option<String> {
    let mut names: Vec<String> = Vec::new();
    for character in app.sessions.online_characters().await {
        if character.temp(TEMP_GHOST).await.is_none() {
            names.push(character.name().to_string());
        }
    }
    names.sort_by_key(|n| n.to_lowercase());

    Some(match names.len() {
        0 => "Nobody is online.".to_string(),
        1 => format!("1 character online: {}.", names.join(", ")),
        n => format!("{n} characters online: {}.", names.join(", ")),
    })
}

pub(super) fn handle_commands(app: &App, ctx: &CommandContext) -> Option<String> {
    let names: Vec<&str> = app
        .commands
        .visible(&ctx.caller)
        .iter()
        .map(|c| c.name)
        .collect();
    Some(format!("Commands: {}", names.join(", ")))
}
