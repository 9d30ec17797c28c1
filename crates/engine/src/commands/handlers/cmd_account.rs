use super::*;
use crate::infrastructure::password::{hash_password, PasswordError};
use crate::use_cases::session::LoginError;
use mudhall_domain::attributes::SETTINGS;

pub(super) async fn handle_login(app: &App, ctx: &CommandContext) -> Option<String> {
    let name = ctx.required("character");
    let password = ctx.required("password");

    match app
        .use_cases
        .session
        .login
        .execute(&ctx.session, name, password)
        .await
    {
        Ok(character) => {
            welcome(app, &character).await;
            None
        }
        Err(e) => {
            tracing::info!(
                session_id = %ctx.session.id(),
                character = %name,
                error = %e,
                "Login rejected"
            );
            Some(
                match e {
                    LoginError::CharacterNotFound => "Character not found.",
                    LoginError::WrongPassword => "Password incorrect for that character.",
                    LoginError::AlreadyLoggedIn => "This character is already logged in.",
                    LoginError::RoomMissing(_) => NOWHERE,
                    LoginError::SessionClosed | LoginError::Domain(_) => {
                        "You can't enter the world right now."
                    }
                }
                .to_string(),
            )
        }
    }
}

/// Everything a client needs right after login.
async fn welcome(app: &App, character: &Character) {
    let _ = character
        .notify(ServerMessage::SyncPlayerInfo(
            app.sync.player_info(character).await,
        ))
        .await;
    send_permissions(character).await;
    app.sync.send_inventory(character).await;
    character
        .show_text(format!("Welcome, {}.", character.name()))
        .await;
    if let Some(room) = current_room(app, character).await {
        app.sync.room_view(character, &room, true).await;
        let view = super::cmd_look::describe_room(app, character, &room).await;
        character.show_text(view).await;
    }
}

pub(super) async fn handle_logout(app: &App, ctx: &CommandContext) -> Option<String> {
    let _ = ctx.session.send(ServerMessage::Disconnect);
    app.use_cases.session.teardown.execute(&ctx.session).await;
    None
}

pub(super) async fn handle_password(ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;
    let password = ctx.required("password").to_string();

    let hashed = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Password hashing task failed");
            return Some("Your password could not be changed.".to_string());
        }
    };
    match hashed {
        Ok(phc) => {
            character.set_password_hash(phc).await;
            tracing::info!(character = %character.name(), "Password changed");
            Some("Password changed.".to_string())
        }
        Err(PasswordError::Empty) => Some("Your password can't be empty.".to_string()),
        Err(e) => {
            tracing::error!(character = %character.name(), error = %e, "Password hashing failed");
            Some("Your password could not be changed.".to_string())
        }
    }
}

pub(super) async fn handle_settings(ctx: &CommandContext) -> Option<String> {
    let character = actor(ctx)?;

    let Some(name) = ctx.arg("name") else {
        let mut text = String::from("Settings:");
        for definition in SETTINGS {
            let value = character.setting(definition.name).await.unwrap_or_default();
            text.push_str(&format!(
                "\n  {}: {} - {}",
                definition.name, value, definition.description
            ));
        }
        return Some(text);
    };

    let Some(value) = ctx.arg("value") else {
        return Some(match character.setting(name).await {
            Some(value) => format!("{name}: {value}"),
            None => format!("There's no setting named '{name}'."),
        });
    };

    Some(match character.set_setting(name, value).await {
        Ok(()) => format!("Setting '{name}' is now {value}."),
        Err(DomainError::NotFound { .. }) => format!("There's no setting named '{name}'."),
        Err(e) => describe(&e),
    })
}
