// Holdaccent Replay Scripts
// Timed key events and host actions, one per line

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ConfigError;
use crate::key::key_from_name;
use crate::{Action, Key};

/// Replay script errors
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// What happens at one point in a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// A single key event
    Key {
        key: Key,
        text: Option<char>,
        action: Action,
    },
    /// Press immediately followed by release
    Tap { key: Key, text: Option<char> },
    /// Input focus moves to another context
    Focus(String),
    Enable,
    Disable,
    /// Reconfigure from a TOML file
    Reload(PathBuf),
    /// Only advance time
    Wait,
}

/// A command with its offset from the start of the replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub at: Duration,
    pub line: usize,
    pub command: ScriptCommand,
}

/// Parsed replay script
///
/// ```text
/// # comment
/// 0    press a
/// 200  press space
/// 250  release a
/// 300  focus terminal
/// 900  wait
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    /// Load a script file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse script text. Offsets must be non-decreasing.
    pub fn parse(content: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        let mut last = Duration::ZERO;

        for (index, raw) in content.lines().enumerate() {
            let line = index + 1;
            let tokens = strip_comment(raw.split_whitespace().collect());
            if tokens.is_empty() {
                continue;
            }

            let step = parse_line(&tokens, line)?;
            if step.at < last {
                return Err(parse_error(
                    line,
                    format!(
                        "time {}ms goes backwards (previous {}ms)",
                        step.at.as_millis(),
                        last.as_millis()
                    ),
                ));
            }
            last = step.at;
            steps.push(step);
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Resolve a key token: a single character types itself, anything longer
/// is a key name.
pub fn parse_key_token(token: &str) -> Result<(Key, Option<char>), String> {
    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok((Key::for_char(ch), Some(ch)));
    }

    let key = key_from_name(token).ok_or_else(|| format!("Unknown key: {}", token))?;
    let text = if key == Key::SPACE { Some(' ') } else { None };
    Ok((key, text))
}

// A token starting with '#' opens a comment, except a lone '#' in key
// position, so `0 press #` still names the '#' key.
fn strip_comment<'a>(mut tokens: Vec<&'a str>) -> Vec<&'a str> {
    let end = tokens
        .iter()
        .enumerate()
        .position(|(i, t)| t.starts_with('#') && !(i == 2 && *t == "#"))
        .unwrap_or(tokens.len());
    tokens.truncate(end);
    tokens
}

fn parse_line(tokens: &[&str], line: usize) -> Result<ScriptStep, ScriptError> {
    let mut parts = tokens.iter().copied();

    let time = parts
        .next()
        .ok_or_else(|| parse_error(line, "missing time".to_string()))?;
    let millis: u64 = time
        .trim_end_matches("ms")
        .parse()
        .map_err(|_| parse_error(line, format!("invalid time '{}'", time)))?;

    let verb = parts
        .next()
        .ok_or_else(|| parse_error(line, "missing command".to_string()))?
        .to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    let command = match verb.as_str() {
        "press" | "release" | "repeat" => {
            let action = verb.parse::<Action>().map_err(|e| parse_error(line, e))?;
            let (key, text) = single_key_arg(&args, line)?;
            ScriptCommand::Key { key, text, action }
        }
        "tap" => {
            let (key, text) = single_key_arg(&args, line)?;
            ScriptCommand::Tap { key, text }
        }
        "focus" => match args.as_slice() {
            [name] => ScriptCommand::Focus(name.to_string()),
            _ => return Err(parse_error(line, "focus takes one context name".to_string())),
        },
        "reload" => match args.as_slice() {
            [path] => ScriptCommand::Reload(PathBuf::from(path)),
            _ => return Err(parse_error(line, "reload takes one path".to_string())),
        },
        "enable" | "disable" | "wait" if !args.is_empty() => {
            return Err(parse_error(line, format!("{} takes no arguments", verb)));
        }
        "enable" => ScriptCommand::Enable,
        "disable" => ScriptCommand::Disable,
        "wait" => ScriptCommand::Wait,
        other => return Err(parse_error(line, format!("unknown command '{}'", other))),
    };

    Ok(ScriptStep {
        at: Duration::from_millis(millis),
        line,
        command,
    })
}

fn single_key_arg(args: &[&str], line: usize) -> Result<(Key, Option<char>), ScriptError> {
    match args {
        [token] => parse_key_token(token).map_err(|e| parse_error(line, e)),
        _ => Err(parse_error(line, "expected exactly one key".to_string())),
    }
}

fn parse_error(line: usize, message: String) -> ScriptError {
    ScriptError::Parse { line, message }
}
