/// Line-oriented command language read from stdin
use soul_session::{MediaId, PlayFromMediaIdRequest};
use std::time::Duration;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  play-id <id> [--reset] [--at <n>]   play a library item
  add <id>                            append to the queue
  remove <id>                         remove from the queue
  prepare | play | pause | stop
  next | prev                         skip (wraps around)
  seek <ms>                           seek within the track
  queue                               show the queue
  browse                              list the library
  help | quit";

/// Parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    PlayFromId(PlayFromMediaIdRequest),
    Add(MediaId),
    Remove(MediaId),
    Prepare,
    Play,
    Pause,
    Stop,
    Next,
    Previous,
    Seek(Duration),
    Queue,
    Browse,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("not a number: {0}")]
    InvalidNumber(String),
}

/// Parse one line; blank lines and `#` comments yield `None`
pub fn parse_line(line: &str) -> Result<Option<Input>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let input = match command {
        "play-id" => parse_play_id(&mut words)?,
        "add" => Input::Add(required_id(&mut words, "add")?),
        "remove" => Input::Remove(required_id(&mut words, "remove")?),
        "prepare" => Input::Prepare,
        "play" => Input::Play,
        "pause" => Input::Pause,
        "stop" => Input::Stop,
        "next" => Input::Next,
        "prev" => Input::Previous,
        "seek" => {
            let ms = words.next().ok_or(ParseError::MissingArgument {
                command: "seek",
                expected: "a position in ms",
            })?;
            Input::Seek(Duration::from_millis(parse_number(ms)?))
        }
        "queue" => Input::Queue,
        "browse" => Input::Browse,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    if let Some(extra) = words.next() {
        return Err(ParseError::UnexpectedArgument(extra.to_string()));
    }

    Ok(Some(input))
}

fn parse_play_id<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Input, ParseError> {
    let mut request = PlayFromMediaIdRequest::new(required_id(words, "play-id")?);

    while let Some(flag) = words.next() {
        match flag {
            "--reset" => request = request.reset_playlist(),
            "--at" => {
                let position = words.next().ok_or(ParseError::MissingArgument {
                    command: "--at",
                    expected: "a queue position",
                })?;
                request = request.at(parse_number(position)? as usize);
            }
            other => return Err(ParseError::UnexpectedArgument(other.to_string())),
        }
    }

    Ok(Input::PlayFromId(request))
}

fn required_id<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<MediaId, ParseError> {
    words
        .next()
        .map(MediaId::from)
        .ok_or(ParseError::MissingArgument {
            command,
            expected: "a media id",
        })
}

fn parse_number(word: &str) -> Result<u64, ParseError> {
    word.parse()
        .map_err(|_| ParseError::InvalidNumber(word.to_string()))
}
