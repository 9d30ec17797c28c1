//! The command table served to every session.

use super::definition::{
    Argument, Command, HandlerId, CAN_BUILD, CAN_CHAREDIT, CAN_GHOST, CAN_SYSOP,
};

pub fn standard_commands() -> Vec<Command> {
    let mut commands = vec![
        // Account
        Command::new("login", "Log in to an existing character.")
            .require_no_character()
            .arg(Argument::required("character"))
            .arg(Argument::required("password").no_log())
            .handler(HandlerId::Login),
        Command::new("logout", "Leave the world and disconnect.")
            .require_character()
            .handler(HandlerId::Logout),
        Command::new("password", "Change your password.")
            .require_character()
            .arg(Argument::required("password").no_log())
            .handler(HandlerId::Password),
        Command::new("settings", "List your settings, or change one.")
            .require_character()
            .arg(Argument::optional("name"))
            .arg(Argument::optional("value").remaining())
            .handler(HandlerId::Settings),
        // Looking around
        Command::new("look", "Look at the room, or at something in it.")
            .alt("l")
            .require_character()
            .arg(Argument::optional("at").remaining())
            .handler(HandlerId::Look),
        Command::new("glance", "A one-line summary of the room.")
            .alt("gl")
            .require_character()
            .handler(HandlerId::Glance),
        Command::new("who", "List who is online.")
            .require_character()
            .handler(HandlerId::Who),
        // Communication
        Command::new("say", "Say something to the room.")
            .alt("'")
            .require_character()
            .arg(Argument::required("text").remaining())
            .handler(HandlerId::Say),
        Command::new("whisper", "Whisper privately to another character.")
            .alt("w")
            .require_character()
            .arg(Argument::required("target"))
            .arg(Argument::required("message").remaining())
            .handler(HandlerId::Whisper),
        Command::new("reply", "Whisper back to whoever last whispered to you.")
            .alt("r")
            .require_character()
            .arg(Argument::required("message").remaining())
            .handler(HandlerId::Reply),
        // Movement and items
        Command::new("move", "Walk through an exit.")
            .alt("mv")
            .require_character()
            .arg(Argument::required("direction"))
            .handler(HandlerId::Move),
    ];

    for (name, short, target) in [
        ("north", Some("n"), "move north"),
        ("south", Some("s"), "move south"),
        ("east", Some("e"), "move east"),
        // `w` belongs to whisper.
        ("west", None, "move west"),
        ("up", Some("u"), "move up"),
        ("down", Some("d"), "move down"),
    ] {
        let alias = Command::alias(name, target);
        commands.push(match short {
            Some(short) => alias.alt(short),
            None => alias,
        });
    }

    commands.extend([
        Command::new("get", "Pick up an item.")
            .require_character()
            .arg(Argument::required("item").remaining())
            .handler(HandlerId::Get),
        Command::new("drop", "Drop an item you are carrying.")
            .require_character()
            .arg(Argument::required("item").remaining())
            .handler(HandlerId::Drop),
        Command::new("inventory", "List what you are carrying.")
            .alt("inv")
            .alt("i")
            .require_character()
            .handler(HandlerId::Inventory),
        // Building
        Command::new("room", "Edit rooms.")
            .require_permission(CAN_BUILD)
            .sub(
                Command::new("set", "Set an attribute of the current room.")
                    .arg(Argument::required("name"))
                    .arg(Argument::optional("value").remaining())
                    .handler(HandlerId::RoomSet),
            )
            .sub(
                Command::new("create", "Create a room in a direction.")
                    .arg(Argument::required("direction"))
                    .handler(HandlerId::RoomCreate),
            )
            .sub(
                Command::new("destroy", "Destroy the empty room in a direction.")
                    .arg(Argument::required("direction"))
                    .handler(HandlerId::RoomDestroy),
            ),
        Command::new("area", "Edit areas.")
            .require_permission(CAN_BUILD)
            .sub(
                Command::new("create", "Create an area with an origin room.")
                    .arg(Argument::required("name").remaining())
                    .handler(HandlerId::AreaCreate),
            )
            .sub(Command::new("list", "List areas.").handler(HandlerId::AreaList)),
        template_command(
            "item",
            "Edit item templates and instances.",
            [
                HandlerId::ItemCreate,
                HandlerId::ItemList,
                HandlerId::ItemSpawn,
                HandlerId::ItemSet,
                HandlerId::ItemInstanceSet,
                HandlerId::ItemInstances,
            ],
        ),
        template_command(
            "mob",
            "Edit mob templates and instances.",
            [
                HandlerId::MobCreate,
                HandlerId::MobList,
                HandlerId::MobSpawn,
                HandlerId::MobSet,
                HandlerId::MobInstanceSet,
                HandlerId::MobInstances,
            ],
        ),
        Command::new("wipe", "Delete every item and mob in the current room.")
            .require_permission(CAN_BUILD)
            .handler(HandlerId::Wipe),
        // Administration
        Command::new("character", "Manage characters.")
            .require_permission(CAN_CHAREDIT)
            .sub(
                Command::new("list", "List characters, optionally filtered by name.")
                    .arg(Argument::optional("filter"))
                    .handler(HandlerId::CharacterList),
            )
            .sub(
                Command::new("create", "Create a character where you stand.")
                    .arg(Argument::required("character"))
                    .arg(Argument::required("password").no_log())
                    .handler(HandlerId::CharacterCreate),
            )
            .sub(
                Command::new("set", "Set an attribute of a character.")
                    .arg(Argument::required("character"))
                    .arg(Argument::required("name"))
                    .arg(Argument::optional("value").remaining())
                    .handler(HandlerId::CharacterSet),
            ),
        Command::new("ghost", "Toggle moving unseen.")
            .require_permission(CAN_GHOST)
            .handler(HandlerId::Ghost),
        Command::new("save", "Save the world now.")
            .require_permission(CAN_SYSOP)
            .handler(HandlerId::Save),
        Command::new("tickers", "List scheduled tasks.")
            .require_permission(CAN_SYSOP)
            .handler(HandlerId::Tickers),
        Command::new("commands", "List the commands you can use.").handler(HandlerId::Commands),
    ]);

    commands
}

/// `item` and `mob` share one shape; `handlers` are create, list, spawn, set,
/// iset, instances.
fn template_command(name: &'static str, help: &'static str, handlers: [HandlerId; 6]) -> Command {
    let [create, list, spawn, set, iset, instances] = handlers;
    Command::new(name, help)
        .require_permission(CAN_BUILD)
        .sub(
            Command::new("create", "Create a template.")
                .arg(Argument::required("name"))
                .handler(create),
        )
        .sub(Command::new("list", "List templates.").handler(list))
        .sub(
            Command::new("spawn", "Create an instance in the current room.")
                .arg(Argument::required("name"))
                .handler(spawn),
        )
        .sub(
            Command::new("set", "Set a template attribute.")
                .arg(Argument::required("template"))
                .arg(Argument::required("name"))
                .arg(Argument::optional("value").remaining())
                .handler(set),
        )
        .sub(
            Command::new("iset", "Set an instance attribute override.")
                .arg(Argument::required("instance"))
                .arg(Argument::required("name"))
                .arg(Argument::optional("value").remaining())
                .handler(iset),
        )
        .sub(
            Command::new("instances", "List the instances of a template.")
                .arg(Argument::required("template"))
                .handler(instances),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::definition::Caller;
    use crate::commands::dispatcher::{resolve, Resolution};

    #[test]
    fn top_level_names_are_unique() {
        let commands = standard_commands();
        let mut seen = Vec::new();
        for command in &commands {
            for name in std::iter::once(command.name).chain(command.alt_names.iter().copied()) {
                assert!(!seen.contains(&name), "duplicate command name {name}");
                seen.push(name);
            }
        }
    }

    #[test]
    fn direction_shortcuts_rewrite_to_move() {
        let commands = standard_commands();
        let caller = Caller {
            has_character: true,
            permissions: Vec::new(),
        };

        assert!(matches!(resolve(&commands, "n", &caller), Resolution::Rewrite(l) if l == "move north"));
        assert!(matches!(resolve(&commands, "down", &caller), Resolution::Rewrite(l) if l == "move down"));
        assert!(matches!(
            resolve(&commands, "w Alice hi", &caller),
            Resolution::Invoke { handler: HandlerId::Whisper, .. }
        ));
    }

    #[test]
    fn every_leaf_has_a_handler() {
        fn check(command: &Command) {
            if command.alias.is_some() {
                return;
            }
            if command.subcommands.is_empty() {
                assert!(command.handler.is_some(), "{} has no handler", command.name);
            }
            command.subcommands.iter().for_each(check);
        }
        standard_commands().iter().for_each(check);
    }
}
