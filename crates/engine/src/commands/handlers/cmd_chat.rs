use super::*;
use crate::use_cases::room_events::EVENT_CHARACTER_SAID;
use mudhall_domain::attributes::TEMP_REPLY_TO;

pub(super) async fn handle_say(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let text = ctx.required("text");
    let Some(room) = current_room(app, character).await else {
        return Some(NOWHERE.to_string());
    };

    app.events
        .announce(
            &room,
            Some(character.id()),
            &format!("{} says, \"{}\"", character.name(), text),
        )
        .await;
    app.events
        .fire_mobs(
            &room,
            EVENT_CHARACTER_SAID,
            vec![character.name().to_string(), text.to_string()],
        )
        .await;

    Some(format!("You say, \"{text}\""))
}

pub(super) async fn handle_whisper(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    Some(whisper(app, character, ctx.required("target"), ctx.required("message")).await)
}

pub(super) async fn handle_reply(app: &App, ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let Some(target) = character.temp(TEMP_REPLY_TO).await else {
        return Some("Nobody has whispered to you yet.".to_string());
    };
    Some(whisper(app, character, &target, ctx.required("message")).await)
}

async fn whisper(app: &App, from: &Character, target: &str, message: &str) -> String {
    let Some(target) = app.world.character_by_name(target).await else {
        return "Character not found.".to_string();
    };
    if target.id() == from.id() {
        return "You can't whisper to yourself.".to_string();
    }
    if !target.is_online().await {
        return format!("{} is not online.", target.name());
    }

    target
        .set_temp(TEMP_REPLY_TO, Some(from.name().to_string()))
        .await;
    target
        .show_text(format!("{} whispers to you, \"{}\"", from.name(), message))
        .await;
    format!("You whisper to {}, \"{}\"", target.name(), message)
}
