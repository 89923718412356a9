//! Line-oriented command protocol over `NoteService`.
//!
//! # Responsibility
//! - Parse one input line into a note command.
//! - Run it and render a status-coded JSON response.
//!
//! # Invariants
//! - Every non-blank input line yields exactly one response; blank lines are
//!   skipped and bad input is a 400.
//! - Status codes follow the REST mapping of the notes API.

use log::error;
use notes_core::{core_version, NewNote, NotePatch, NoteService};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const HELP: &str = "commands:
  create {\"title\":..,\"content\":..}
  list
  get <id>
  update <id> {\"title\"?:..,\"content\"?:..}
  delete <id>
  version
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create(NewNote),
    List,
    Get(String),
    Update(String, NotePatch),
    Delete(String),
    Version,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    UnexpectedArgument(String),
    InvalidBody(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(value) => write!(f, "unknown command `{value}`; try `help`"),
            Self::MissingArgument(name) => write!(f, "missing argument: {name}"),
            Self::UnexpectedArgument(value) => write!(f, "unexpected argument `{value}`"),
            Self::InvalidBody(details) => write!(f, "invalid request body: {details}"),
        }
    }
}

impl Error for ParseError {}

/// One rendered reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
            error: None,
        }
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            body: None,
            error: None,
        }
    }

    fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: None,
            error: Some(message.into()),
        }
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<Result<Command, ParseError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (verb, rest) = split_word(line);
    let command = match verb.to_ascii_lowercase().as_str() {
        "create" => parse_body(rest).map(Command::Create),
        "list" => Ok(Command::List),
        "get" => require_id(rest).map(Command::Get),
        "update" => {
            let (id, body) = split_word(rest);
            require_id(id).and_then(|id| parse_body(body).map(|patch| Command::Update(id, patch)))
        }
        "delete" => require_id(rest).map(Command::Delete),
        "version" => Ok(Command::Version),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    };
    Some(command)
}

/// Runs one command against the service.
pub fn execute(service: &NoteService, command: Command) -> Response {
    let result = match command {
        Command::Create(input) => service.create_note(input).map(|note| render(201, &note)),
        Command::List => service.list_notes().map(|notes| render(200, &notes)),
        Command::Get(id) => service.get_note(&id).map(|note| render(200, &note)),
        Command::Update(id, patch) => service
            .update_note(&id, patch)
            .map(|note| render(200, &note)),
        Command::Delete(id) => {
            return match service.delete_note(&id) {
                Ok(()) => Response::empty(204),
                Err(err) => Response::failure(err.status_code(), err.to_string()),
            };
        }
        Command::Version => return Response::ok(200, Value::from(core_version())),
        Command::Help => return Response::ok(200, Value::from(HELP)),
        Command::Quit => return Response::empty(200),
    };

    result.unwrap_or_else(|err| Response::failure(err.status_code(), err.to_string()))
}

/// Response for a line that failed to parse.
pub fn bad_request(err: &ParseError) -> Response {
    Response::failure(400, err.to_string())
}

fn render<T: Serialize>(status: u16, value: &T) -> Response {
    match serde_json::to_value(value) {
        Ok(body) => Response::ok(status, body),
        Err(err) => {
            error!("event=cli_render module=cli status=error error={err}");
            Response::failure(500, format!("failed to encode response: {err}"))
        }
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], input[idx..].trim()),
        None => (input, ""),
    }
}

fn require_id(value: &str) -> Result<String, ParseError> {
    let (id, extra) = split_word(value);
    if id.is_empty() {
        return Err(ParseError::MissingArgument("id"));
    }
    if !extra.is_empty() {
        return Err(ParseError::UnexpectedArgument(extra.to_string()));
    }
    Ok(id.to_string())
}

fn parse_body<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, ParseError> {
    if value.trim().is_empty() {
        return Err(ParseError::MissingArgument("body"));
    }
    serde_json::from_str(value).map_err(|err| ParseError::InvalidBody(err.to_string()))
}
