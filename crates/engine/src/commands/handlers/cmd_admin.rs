use super::*;
use crate::infrastructure::password::hash_password;
use mudhall_domain::attributes::{ATTR_PERMISSIONS, TEMP_GHOST};
use mudhall_domain::CharacterId;

pub(super) async fn handle_character_list(app: &App, ctx: &CommandContext) -> Option<String> {
    let filter = ctx.arg("filter").map(str::to_lowercase);
    let mut characters = app.world.characters().await;
    if let Some(filter) = &filter {
        characters.retain(|c| c.name().to_lowercase().contains(filter.as_str()));
    }
    if characters.is_empty() {
        return Some("There are no characters.".to_string());
    }

    let mut text = String::from("Characters:");
    for character in characters {
        let status = if character.is_online().await {
            "online".to_string()
        } else {
            match character.lock().await.last_seen {
                Some(seen) => format!("last seen {}", seen.format("%Y-%m-%d %H:%M UTC")),
                None => "never logged in".to_string(),
            }
        };
        text.push_str(&format!("\n  {} ({})", character.name(), status));
    }
    Some(text)
}

pub(super) async fn handle_character_create(app: &App, ctx: &CommandContext) -> Option<String> {
    let creator = actor(ctx)?;
    let name = ctx.required("character");
    if app.world.character_by_name(name).await.is_some() {
        return Some("A character with that name already exists.".to_string());
    }

    let password = ctx.required("password").to_string();
    let phc = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
        Ok(Ok(phc)) => phc,
        Ok(Err(e)) => return Some(format!("The character could not be created: {e}.")),
        Err(e) => {
            tracing::error!(error = %e, "Password hashing task failed");
            return Some("The character could not be created.".to_string());
        }
    };

    let character = Arc::new(Character::new(
        CharacterId::new(),
        name,
        phc,
        creator.location().await,
    ));
    if let Err(e) = app.world.add_character(character).await {
        return Some(describe(&e));
    }
    tracing::info!(creator = %creator.name(), character = %name, "Character created");
    Some(format!("Created the character {name}."))
}

pub(super) async fn handle_character_set(app: &App, ctx: &CommandContext) -> Option<String> {
    let target = ctx.required("character");
    let name = ctx.required("name");
    let value = ctx.arg("value").unwrap_or_default();
    let Some(character) = app.world.character_by_name(target).await else {
        return Some("Character not found.".to_string());
    };

    if let Err(e) = character.set_attribute(name, value).await {
        return Some(describe(&e));
    }
    tracing::info!(
        editor = %actor(ctx).map_or("anonymous", |c| c.name()),
        character = %character.name(),
        attribute = %name,
        "Character attribute set"
    );
    if name == ATTR_PERMISSIONS {
        send_permissions(&character).await;
    }

    Some(if value.is_empty() {
        format!("Cleared {}'s {}.", character.name(), name)
    } else {
        format!("Set {}'s {} to '{}'.", character.name(), name, value)
    })
}

pub(super) async fn handle_ghost(ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    if character.temp(TEMP_GHOST).await.is_some() {
        character.set_temp(TEMP_GHOST, None).await;
        Some("You are visible again.".to_string())
    } else {
        character
            .set_temp(TEMP_GHOST, Some("true".to_string()))
            .await;
        Some("You are now a ghost.".to_string())
    }
}

pub(super) async fn handle_save(app: &App) -> Option<String> {
    match app.use_cases.persistence.save.execute().await {
        Ok(bytes) => Some(format!("World saved ({bytes} bytes).")),
        Err(e) => {
            tracing::error!(error = %e, "Manual save failed");
            Some(format!("Save failed: {e}"))
        }
    }
}

pub(super) async fn handle_tickers(app: &App) -> Option<String> {
    let mut text = String::from("Tickers:");
    for snapshot in app.scheduler.snapshots().await {
        let last = match (snapshot.last_start, snapshot.last_duration) {
            (Some(start), Some(duration)) => format!(
                "last started {} and took {}ms",
                start.format("%Y-%m-%d %H:%M:%S UTC"),
                duration.as_millis()
            ),
            (Some(start), None) => format!(
                "running since {}",
                start.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            _ => "never run".to_string(),
        };
        text.push_str(&format!(
            "\n  {}: every {}s, {} runs, {}",
            snapshot.name,
            snapshot.interval.as_secs(),
            snapshot.iterations,
            last
        ));
    }
    Some(text)
}
