//! Input line parsing for the chat prompt.
//!
//! One line of input maps to exactly one [`Command`]. Bare text becomes
//! [`Command::Send`]; lines starting with `!` select an explicit command.
//! Parsing never fails: input that matches nothing is carried verbatim in
//! [`Command::Unknown`] so the caller can report it without acting on it.

use crate::openai::Role;

/// A parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Bare text, to be sent as a user turn.
    Send(String),
    /// Append one turn with the given role, without sending.
    Append(Role, String),
    /// Clear the conversation history.
    Reset,
    /// Print the conversation history.
    Debug,
    /// Print the usage summary.
    Help,
    /// Leave the prompt loop.
    Exit,
    /// Whitespace-only input, a no-op.
    Empty,
    /// An unrecognized `!`-command, kept verbatim.
    Unknown(String),
}

/// Parses one line of input.
///
/// `?` is an alias for `!help`. Text following an argument-less command
/// (`!reset now`) is ignored. Missing text after `!user`/`!bot`/`!sys`
/// appends empty content; no validation is performed.
pub fn parse(line: &str) -> Command {
    let line = line.trim();

    if line.is_empty() {
        return Command::Empty;
    }
    if line == "?" {
        return Command::Help;
    }

    let Some(rest) = line.strip_prefix('!') else {
        return Command::Send(line.to_owned());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "user" => Command::Append(Role::User, arg.to_owned()),
        "bot" => Command::Append(Role::Assistant, arg.to_owned()),
        "sys" => Command::Append(Role::System, arg.to_owned()),
        "reset" => Command::Reset,
        "debug" => Command::Debug,
        "help" => Command::Help,
        "exit" => Command::Exit,
        _ => Command::Unknown(line.to_owned()),
    }
}
