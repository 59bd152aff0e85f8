//! Command parsing for the input line.
//!
//! This module parses submitted lines into structured [`Command`] values.

/// Parsed command from user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Publish an update for the default entry.
    Update {
        /// Update text, exactly as typed.
        update: String,
    },

    /// Publish an update for an explicit entry.
    EntryUpdate {
        /// Guide entry.
        entry: String,
        /// Update text.
        update: String,
    },

    /// Quit the application.
    Quit,

    /// Command with missing or invalid arguments.
    InvalidArgs {
        /// Command name.
        command: String,
        /// Error message.
        error: String,
    },
}

/// Parse a submitted line into a command.
///
/// Only `/quit`, `/q` and `/entry` are reserved, and only with the `/` as the
/// very first character. Anything else is an update kept verbatim, surrounding
/// whitespace included. A leading `//` publishes the rest with a single `/`.
pub fn parse(input: &str) -> Command {
    if let Some(escaped) = input.strip_prefix("//") {
        return Command::Update { update: format!("/{escaped}") };
    }

    if input == "/quit" || input == "/q" {
        return Command::Quit;
    }

    let entry_args = input
        .strip_prefix("/entry")
        .filter(|args| args.is_empty() || args.starts_with(char::is_whitespace));
    if let Some(args) = entry_args {
        return parse_entry(args);
    }

    Command::Update { update: input.to_string() }
}

fn parse_entry(args: &str) -> Command {
    let mut parts = args.trim_start().splitn(2, char::is_whitespace);
    let entry = parts.next().filter(|e| !e.is_empty());
    let update = parts.next().map(str::trim).filter(|u| !u.is_empty());

    match (entry, update) {
        (Some(entry), Some(update)) => {
            Command::EntryUpdate { entry: entry.to_string(), update: update.to_string() }
        },
        _ => Command::InvalidArgs {
            command: "entry".into(),
            error: "Usage: /entry <place> <update>".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(text: &str) -> Command {
        Command::Update { update: text.into() }
    }

    #[test]
    fn parse_update() {
        assert_eq!(parse("Mostly Harmless."), update("Mostly Harmless."));
    }

    #[test]
    fn parse_update_keeps_whitespace() {
        assert_eq!(parse("  spaced  "), update("  spaced  "));
    }

    #[test]
    fn parse_entry_update() {
        assert_eq!(
            parse("/entry Magrathea Mostly harmless planets"),
            Command::EntryUpdate {
                entry: "Magrathea".into(),
                update: "Mostly harmless planets".into()
            }
        );
    }

    #[test]
    fn parse_entry_missing_update() {
        assert!(
            matches!(parse("/entry Magrathea"), Command::InvalidArgs { command, .. } if command == "entry")
        );
        assert!(matches!(parse("/entry"), Command::InvalidArgs { .. }));
        assert!(matches!(parse("/entry   "), Command::InvalidArgs { .. }));
    }

    #[test]
    fn parse_quit() {
        assert_eq!(parse("/quit"), Command::Quit);
        assert_eq!(parse("/q"), Command::Quit);
    }

    #[test]
    fn slash_lines_that_are_not_commands_are_updates() {
        assert_eq!(parse("/towel"), update("/towel"));
        assert_eq!(parse("/etc/hosts is mostly harmless"), update("/etc/hosts is mostly harmless"));
        assert_eq!(parse("/quitter"), update("/quitter"));
        assert_eq!(parse("/entrymatic"), update("/entrymatic"));
        assert_eq!(parse("/q now"), update("/q now"));
    }

    #[test]
    fn commands_need_slash_first() {
        assert_eq!(parse("  /q"), update("  /q"));
        assert_eq!(parse(" /entry Magrathea Harmless."), update(" /entry Magrathea Harmless."));
    }

    #[test]
    fn double_slash_escapes() {
        assert_eq!(parse("//q"), update("/q"));
        assert_eq!(parse("//entry is a command"), update("/entry is a command"));
        assert_eq!(parse("//"), update("/"));
    }
}
