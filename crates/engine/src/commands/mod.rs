//! Command dispatch.
//!
//! A session's inbound loop hands each command line to [`execute_line`], which
//! resolves it against the command tree and runs at most one handler. Handlers
//! finish before the loop reads the next frame, so one session's commands are
//! strictly ordered.

mod catalog;
pub mod definition;
pub mod dispatcher;
mod handlers;
pub mod parser;

pub use definition::{Argument, Caller, Command, HandlerId, Predicate};
pub use dispatcher::{resolve, Resolution, INVALID_COMMAND};
pub use parser::BoundArgs;

use std::sync::Arc;
use std::time::Instant;

use crate::app::App;
use crate::entities::Character;
use crate::stores::Session;

/// Bound on alias rewrites per line.
const MAX_REWRITES: usize = 8;

/// The command tree served to sessions.
pub struct CommandSet {
    commands: Vec<Command>,
}

impl CommandSet {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn standard() -> Self {
        Self::new(catalog::standard_commands())
    }

    pub fn resolve(&self, line: &str, caller: &Caller) -> Resolution<'_> {
        dispatcher::resolve(&self.commands, line, caller)
    }

    pub fn visible(&self, caller: &Caller) -> Vec<&Command> {
        dispatcher::visible(&self.commands, caller)
    }
}

/// Everything a handler gets about the invocation.
pub struct CommandContext {
    pub session: Arc<Session>,
    pub character: Option<Arc<Character>>,
    pub caller: Caller,
    pub path: String,
    pub args: BoundArgs,
}

impl CommandContext {
    #[inline]
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name)
    }

    /// A required argument; the dispatcher guarantees presence.
    #[inline]
    pub fn required(&self, name: &str) -> &str {
        self.args.get(name).unwrap_or_default()
    }
}

/// Resolves and runs one command line for `session`.
pub async fn execute_line(app: &App, session: &Arc<Session>, line: &str) {
    let character = session.character().await;
    let caller = Caller::for_character(character.as_deref()).await;

    let mut line = line.to_string();
    for _ in 0..MAX_REWRITES {
        match app.commands.resolve(&line, &caller) {
            Resolution::Ignore => return,
            Resolution::Reply(text) => {
                session.show_text(text);
                return;
            }
            Resolution::Rewrite(next) => line = next,
            Resolution::Invoke {
                handler,
                path,
                args,
                ..
            } => {
                let ctx = CommandContext {
                    session: Arc::clone(session),
                    character,
                    caller,
                    path,
                    args,
                };
                let started = Instant::now();
                let reply = handlers::run(app, &ctx, handler).await;
                tracing::info!(
                    session_id = %session.id(),
                    character = %ctx.character.as_ref().map_or("anonymous", |c| c.name()),
                    command = %ctx.path,
                    args = %ctx.args,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Command executed"
                );
                if let Some(text) = reply {
                    session.show_text(text);
                }
                return;
            }
        }
    }

    tracing::warn!(session_id = %session.id(), line = %line, "Alias rewrite limit reached");
    session.show_text(INVALID_COMMAND);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{drain_texts, online_character, TestWorld};
    use mudhall_domain::attributes::ATTR_PERMISSIONS;
    use mudhall_domain::Coords;
    use mudhall_shared::ServerMessage;

    #[tokio::test]
    async fn login_then_look_from_a_fresh_session() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        room.set_attribute("title", "The Crossroads").await.expect("set");
        t.offline_character("Bob", "hunter2", &room).await;
        let (session, mut rx) = Session::new(64);
        t.sessions.register(Arc::clone(&session));

        execute_line(&t.app, &session, "login Bob wrong").await;
        assert_eq!(
            drain_texts(&mut rx),
            vec!["Password incorrect for that character.".to_string()]
        );

        execute_line(&t.app, &session, "login Bob hunter2").await;
        let texts = drain_texts(&mut rx);
        assert!(texts.contains(&"Welcome, Bob.".to_string()));
        assert!(texts.iter().any(|m| m.starts_with("The Crossroads")));

        execute_line(&t.app, &session, "login Bob hunter2").await;
        assert_eq!(drain_texts(&mut rx), vec![INVALID_COMMAND.to_string()]);
    }

    #[tokio::test]
    async fn anonymous_sessions_only_reach_login() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let (session, mut rx) = Session::new(16);

        execute_line(&t.app, &session, "say hello").await;
        execute_line(&t.app, &session, "north").await;
        execute_line(&t.app, &session, "   ").await;

        assert_eq!(
            drain_texts(&mut rx),
            vec![INVALID_COMMAND.to_string(), INVALID_COMMAND.to_string()]
        );
    }

    #[tokio::test]
    async fn say_reaches_the_room_and_echoes_back() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, mut bob_rx) = online_character(&t, "Bob", &room).await;
        let (_alice, mut alice_rx) = online_character(&t, "Alice", &room).await;
        let session = bob.session().await.expect("attached");

        execute_line(&t.app, &session, "say \"well met\" traveller").await;

        assert_eq!(
            drain_texts(&mut bob_rx),
            vec!["You say, \"well met traveller\"".to_string()]
        );
        assert_eq!(
            drain_texts(&mut alice_rx),
            vec!["Bob says, \"well met traveller\"".to_string()]
        );
    }

    #[tokio::test]
    async fn direction_alias_moves_the_character() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0), Coords::new(0, 1, 0)]).await;
        let a = t.room(Coords::new(0, 0, 0)).await;
        let b = t.room(Coords::new(0, 1, 0)).await;
        let (bob, mut bob_rx) = online_character(&t, "Bob", &a).await;
        let session = bob.session().await.expect("attached");

        execute_line(&t.app, &session, "n").await;

        assert_eq!(bob.location().await, b.location());
        assert!(drain_texts(&mut bob_rx).contains(&"You walk to the north.".to_string()));

        execute_line(&t.app, &session, "north").await;
        assert_eq!(
            drain_texts(&mut bob_rx),
            vec!["You can't move in that direction.".to_string()]
        );
    }

    #[tokio::test]
    async fn building_requires_permission() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, mut rx) = online_character(&t, "Bob", &room).await;
        let session = bob.session().await.expect("attached");

        execute_line(&t.app, &session, "room create east").await;
        assert_eq!(drain_texts(&mut rx), vec![INVALID_COMMAND.to_string()]);

        bob.set_attribute(ATTR_PERMISSIONS, "CAN_BUILD").await.expect("set");
        execute_line(&t.app, &session, "room create east").await;

        assert!(drain_texts(&mut rx).contains(&"You create a room to the east.".to_string()));
        assert!(t.area.room_at(Coords::new(1, 0, 0)).await.is_some());
    }

    #[tokio::test]
    async fn bare_group_lists_permitted_subcommands() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, mut rx) = online_character(&t, "Bob", &room).await;
        bob.set_attribute(ATTR_PERMISSIONS, "CAN_BUILD").await.expect("set");
        let session = bob.session().await.expect("attached");

        execute_line(&t.app, &session, "item").await;

        let texts = drain_texts(&mut rx);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("Syntax: /item <sub-command>"));
        assert!(texts[0].contains("  spawn - "));
    }

    #[tokio::test]
    async fn missing_argument_shows_syntax() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, mut rx) = online_character(&t, "Bob", &room).await;
        let session = bob.session().await.expect("attached");

        execute_line(&t.app, &session, "whisper Alice").await;

        let texts = drain_texts(&mut rx);
        assert_eq!(texts.len(), 1);
        assert!(texts[0].ends_with("Syntax: /whisper <target> <message>"));
    }

    #[tokio::test]
    async fn created_character_can_log_in() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, mut bob_rx) = online_character(&t, "Bob", &room).await;
        bob.set_attribute(ATTR_PERMISSIONS, "CAN_CHAREDIT").await.expect("set");
        let bob_session = bob.session().await.expect("attached");

        execute_line(&t.app, &bob_session, "character create Carol s3cret").await;
        execute_line(&t.app, &bob_session, "character create carol other").await;
        assert_eq!(
            drain_texts(&mut bob_rx),
            vec![
                "Created the character Carol.".to_string(),
                "A character with that name already exists.".to_string(),
            ]
        );

        let (session, mut rx) = Session::new(64);
        execute_line(&t.app, &session, "login Carol s3cret").await;
        assert!(drain_texts(&mut rx).contains(&"Welcome, Carol.".to_string()));
        let carol = t.world.character_by_name("Carol").await.expect("created");
        assert_eq!(carol.location().await, room.location());
    }

    #[tokio::test]
    async fn logout_disconnects_and_tears_down() {
        let t = TestWorld::with_rooms(&[Coords::new(0, 0, 0)]).await;
        let room = t.room(Coords::new(0, 0, 0)).await;
        let (bob, mut rx) = online_character(&t, "Bob", &room).await;
        let session = bob.session().await.expect("attached");

        execute_line(&t.app, &session, "logout").await;

        assert_eq!(rx.try_recv().ok(), Some(ServerMessage::Disconnect));
        assert!(session.cancellation().is_cancelled());
        assert!(!bob.is_online().await);
        assert!(t.sessions.is_empty());
    }
}
