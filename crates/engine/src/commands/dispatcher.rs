//! Resolving an input line against the command tree.
//!
//! Resolution is pure: it decides what should happen to a line without
//! touching the world, so it can be tested on its own.

use super::definition::{Caller, Command, HandlerId};
use super::parser::{bind, tokenize, BoundArgs};

pub const INVALID_COMMAND: &str = "That's an invalid command.";

#[derive(Debug)]
pub enum Resolution<'a> {
    Invoke {
        command: &'a Command,
        handler: HandlerId,
        /// Space-joined names from the top-level command down to the leaf.
        path: String,
        args: BoundArgs,
    },
    /// Re-enter parsing with this line.
    Rewrite(String),
    /// Show this text and stop.
    Reply(String),
    /// Blank line.
    Ignore,
}

pub fn resolve<'a>(commands: &'a [Command], line: &str, caller: &Caller) -> Resolution<'a> {
    let tokens = tokenize(line);
    let Some(first) = tokens.first() else {
        return Resolution::Ignore;
    };

    let Some(command) = commands.iter().find(|c| c.matches(first)) else {
        return Resolution::Reply(INVALID_COMMAND.to_string());
    };

    if let Some(target) = command.alias {
        let rest = line.trim_start()[first_token_len(line.trim_start())..].trim();
        let rewritten = if rest.is_empty() {
            target.to_string()
        } else {
            format!("{target} {rest}")
        };
        return Resolution::Rewrite(rewritten);
    }

    if !command.is_permitted(caller) {
        return Resolution::Reply(INVALID_COMMAND.to_string());
    }

    let mut node = command;
    let mut path = command.name.to_string();
    let mut consumed = 1;
    while !node.subcommands.is_empty() {
        let next = tokens
            .get(consumed)
            .and_then(|token| node.subcommands.iter().find(|sub| sub.matches(token)));
        match next {
            Some(sub) if !sub.is_permitted(caller) => {
                return Resolution::Reply(INVALID_COMMAND.to_string())
            }
            Some(sub) => {
                node = sub;
                path.push(' ');
                path.push_str(sub.name);
                consumed += 1;
            }
            None => return Resolution::Reply(subcommand_help(node, &path, caller)),
        }
    }

    let Ok(args) = bind(&node.arguments, &tokens[consumed..]) else {
        return Resolution::Reply(syntax_help(node, &path));
    };

    match node.handler {
        Some(handler) => Resolution::Invoke {
            command: node,
            handler,
            path,
            args,
        },
        None => {
            tracing::warn!(command = %path, "Leaf command has no handler");
            Resolution::Reply(INVALID_COMMAND.to_string())
        }
    }
}

/// Commands the caller could run, in table order.
pub fn visible<'a>(commands: &'a [Command], caller: &Caller) -> Vec<&'a Command> {
    commands
        .iter()
        .filter(|c| c.alias.is_none() && c.is_permitted(caller))
        .collect()
}

fn first_token_len(line: &str) -> usize {
    line.find(char::is_whitespace).unwrap_or(line.len())
}

fn subcommand_help(node: &Command, path: &str, caller: &Caller) -> String {
    let mut help = format!("{}\nSyntax: /{} <sub-command>\nSub-commands:", node.help, path);
    for sub in node.subcommands.iter().filter(|s| s.is_permitted(caller)) {
        help.push_str(&format!("\n  {} - {}", sub.name, sub.help));
    }
    help
}

fn syntax_help(node: &Command, path: &str) -> String {
    let syntax = node.syntax();
    if syntax.is_empty() {
        format!("{}\nSyntax: /{}", node.help, path)
    } else {
        format!("{}\nSyntax: /{} {}", node.help, path, syntax)
    }
}
