//! Argument-list parser for the todo CLI.
//!
//! # Invariants
//! - Argument-count checks run before lexical checks of ids and booleans.
//! - Extra trailing arguments are ignored.

use super::{
    Command, ADD_USAGE, DELETE_USAGE, DONE_USAGE, GET_USAGE, LIST_USAGE, UPDATE_USAGE,
};
use crate::model::todo::TodoId;
use log::debug;
use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};

const ALL_USAGES: [&str; 6] = [
    ADD_USAGE,
    LIST_USAGE,
    GET_USAGE,
    UPDATE_USAGE,
    DELETE_USAGE,
    DONE_USAGE,
];

/// Parse-stage failure. None of these reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No subcommand was given at all.
    MissingCommand,
    /// Too few arguments for the subcommand; carries the expected form.
    Usage(&'static str),
    InvalidId(String),
    InvalidBool(String),
    UnknownCommand(String),
    /// An argument could not be decoded as UTF-8; carries its position.
    NonUtf8Argument(usize),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCommand => write!(f, "{}", usage_text()),
            Self::Usage(form) => write!(f, "Usage: {form}"),
            Self::InvalidId(raw) => write!(f, "invalid id `{raw}`: expected an integer"),
            Self::InvalidBool(raw) => write!(
                f,
                "invalid is_done `{raw}`: expected one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False"
            ),
            Self::UnknownCommand(name) => write!(f, "unknown command: {name}"),
            Self::NonUtf8Argument(position) => {
                write!(f, "invalid argument {position}: not valid UTF-8")
            }
        }
    }
}

impl Error for CommandError {}

/// Full usage listing shown when no subcommand is given.
pub fn usage_text() -> String {
    let mut text = String::from("Usage:");
    for form in ALL_USAGES {
        text.push_str("\n ");
        text.push_str(form);
    }
    text
}

/// Parses the arguments following the program name into a `Command`.
///
/// `args[0]` is the subcommand; the rest are its positional arguments.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Command, CommandError> {
    let Some((name, rest)) = args.split_first() else {
        return Err(CommandError::MissingCommand);
    };
    let rest: Vec<&str> = rest.iter().map(|arg| arg.as_ref()).collect();

    let command = match name.as_ref() {
        "add" => {
            let &[title, description, ..] = rest.as_slice() else {
                return Err(CommandError::Usage(ADD_USAGE));
            };
            Command::Add {
                title: title.to_string(),
                description: description.to_string(),
            }
        }
        "list" => Command::List,
        "get" => Command::Get {
            id: parse_single_id(&rest, GET_USAGE)?,
        },
        "update" => {
            let &[id, title, description, is_done, ..] = rest.as_slice() else {
                return Err(CommandError::Usage(UPDATE_USAGE));
            };
            Command::Update {
                id: parse_id(id)?,
                title: title.to_string(),
                description: description.to_string(),
                is_done: parse_bool(is_done)?,
            }
        }
        "delete" => Command::Delete {
            id: parse_single_id(&rest, DELETE_USAGE)?,
        },
        "done" => Command::Done {
            id: parse_single_id(&rest, DONE_USAGE)?,
        },
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };

    debug!(
        "event=command_parse module=command status=ok command={}",
        command.name()
    );
    Ok(command)
}

/// Decodes raw OS arguments (program name excluded) into UTF-8 strings.
///
/// Positions in the error are 1-based, counting from the subcommand.
pub fn decode_args<I>(args: I) -> Result<Vec<String>, CommandError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            arg.into_string()
                .map_err(|_| CommandError::NonUtf8Argument(index + 1))
        })
        .collect()
}

/// Parses a decimal integer id with an optional sign.
pub fn parse_id(raw: &str) -> Result<TodoId, CommandError> {
    raw.parse::<TodoId>()
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

/// Parses the accepted boolean literals for `is_done`.
pub fn parse_bool(raw: &str) -> Result<bool, CommandError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CommandError::InvalidBool(raw.to_string())),
    }
}

fn parse_single_id(rest: &[&str], usage: &'static str) -> Result<TodoId, CommandError> {
    match rest.first() {
        Some(raw) => parse_id(raw),
        None => Err(CommandError::Usage(usage)),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_args, parse_args, parse_bool, parse_id, usage_text, CommandError};
    use crate::command::Command;
    use std::ffi::OsString;

    #[test]
    fn add_requires_title_and_description() {
        let err = parse_args(&["add", "only-title"]).unwrap_err();
        assert_eq!(err, CommandError::Usage("add <title> <description>"));
        assert_eq!(err.to_string(), "Usage: add <title> <description>");
    }

    #[test]
    fn add_accepts_empty_description_and_ignores_extra_args() {
        let command = parse_args(&["add", "Buy milk", "", "extra"]).unwrap();
        assert_eq!(
            command,
            Command::Add {
                title: "Buy milk".to_string(),
                description: String::new(),
            }
        );
    }

    #[test]
    fn list_takes_no_arguments() {
        assert_eq!(parse_args(&["list"]).unwrap(), Command::List);
        assert_eq!(parse_args(&["list", "ignored"]).unwrap(), Command::List);
    }

    #[test]
    fn id_commands_report_usage_before_parse_errors() {
        assert_eq!(
            parse_args(&["get"]).unwrap_err(),
            CommandError::Usage("get <id>")
        );
        assert_eq!(
            parse_args(&["delete"]).unwrap_err(),
            CommandError::Usage("delete <id>")
        );
        assert_eq!(
            parse_args(&["done"]).unwrap_err(),
            CommandError::Usage("done <id>")
        );
        assert_eq!(
            parse_args(&["update", "x", "T"]).unwrap_err(),
            CommandError::Usage("update <id> <title> <description> <is_done>")
        );
    }

    #[test]
    fn id_commands_parse_ids() {
        assert_eq!(parse_args(&["get", "3"]).unwrap(), Command::Get { id: 3 });
        assert_eq!(
            parse_args(&["delete", "+4"]).unwrap(),
            Command::Delete { id: 4 }
        );
        assert_eq!(parse_args(&["done", "-1"]).unwrap(), Command::Done { id: -1 });
        assert_eq!(
            parse_args(&["get", "abc"]).unwrap_err(),
            CommandError::InvalidId("abc".to_string())
        );
    }

    #[test]
    fn update_rejects_invalid_boolean() {
        let err = parse_args(&["update", "7", "T", "D", "maybe"]).unwrap_err();
        assert_eq!(err, CommandError::InvalidBool("maybe".to_string()));
    }

    #[test]
    fn update_checks_id_before_boolean() {
        let err = parse_args(&["update", "seven", "T", "D", "maybe"]).unwrap_err();
        assert_eq!(err, CommandError::InvalidId("seven".to_string()));
    }

    #[test]
    fn update_parses_full_payload() {
        let command = parse_args(&["update", "7", "T", "D", "True"]).unwrap();
        assert_eq!(
            command,
            Command::Update {
                id: 7,
                title: "T".to_string(),
                description: "D".to_string(),
                is_done: true,
            }
        );
    }

    #[test]
    fn missing_and_unknown_commands() {
        let empty: [&str; 0] = [];
        assert_eq!(parse_args(&empty).unwrap_err(), CommandError::MissingCommand);

        let err = parse_args(&["frobnicate"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown command: frobnicate");
    }

    #[test]
    fn boolean_literal_set() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse_bool(raw).unwrap(), "{raw} should be true");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse_bool(raw).unwrap(), "{raw} should be false");
        }
        assert!(parse_bool("yes").is_err());
        assert!(parse_bool("tRUE").is_err());
    }

    #[test]
    fn id_rejects_non_integers_and_overflow() {
        assert!(parse_id("1.5").is_err());
        assert!(parse_id("").is_err());
        assert!(parse_id("99999999999999999999").is_err());
        assert_eq!(parse_id("42").unwrap(), 42);
    }

    #[test]
    fn usage_text_lists_every_form() {
        let text = usage_text();
        assert!(text.starts_with("Usage:"));
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains(" update <id> <title> <description> <is_done>"));
    }

    #[test]
    fn decode_args_passes_utf8_through() {
        let decoded = decode_args(["add", "Café", "über"].map(OsString::from)).unwrap();
        assert_eq!(decoded, vec!["add", "Café", "über"]);
    }

    #[cfg(unix)]
    #[test]
    fn decode_args_rejects_non_utf8_with_position() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("add"),
            OsString::from_vec(b"bad\xff".to_vec()),
            OsString::from("desc"),
        ];
        let err = decode_args(args).unwrap_err();
        assert_eq!(err, CommandError::NonUtf8Argument(2));
        assert_eq!(err.to_string(), "invalid argument 2: not valid UTF-8");
    }
}
