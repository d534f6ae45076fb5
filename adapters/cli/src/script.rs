//! Line-oriented action scripts for the demo runner.
//!
//! One action per line, `#` starts a comment. The vocabulary mirrors the
//! bridge operations: `move`, `back`, `left`, `right`, `around`,
//! `face <direction>`, `steps <n>`, `pick`.

use thiserror::Error;

/// One scripted bridge call.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Action {
    /// `move` — advance one cell.
    Move,
    /// `back` — retreat one cell.
    Back,
    /// `left` — rotate 90 degrees counter-clockwise.
    Left,
    /// `right` — rotate 90 degrees clockwise.
    Right,
    /// `around` — rotate 180 degrees.
    Around,
    /// `face <direction>` — face an absolute direction.
    Face(String),
    /// `steps <n>` — advance up to `n` cells.
    Steps(i64),
    /// `pick` — collect a gem on the current cell.
    Pick,
}

/// Failures while parsing an action script.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ScriptError {
    /// The line does not start with a known action word.
    #[error("line {line}: unknown action `{word}`")]
    UnknownAction {
        /// One-based line number.
        line: usize,
        /// The offending first word.
        word: String,
    },
    /// The action requires an argument that is missing.
    #[error("line {line}: `{word}` requires an argument")]
    MissingArgument {
        /// One-based line number.
        line: usize,
        /// The action word missing its argument.
        word: String,
    },
    /// The `steps` argument is not an integer.
    #[error("line {line}: invalid step count `{value}`")]
    InvalidCount {
        /// One-based line number.
        line: usize,
        /// The unparsable argument.
        value: String,
    },
}

/// Parses a script into bridge actions, skipping blanks and comments.
pub(crate) fn parse(source: &str) -> Result<Vec<Action>, ScriptError> {
    let mut actions = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let mut words = text.split_whitespace();
        let word = words.next().unwrap_or_default();
        let action = match word {
            "move" => Action::Move,
            "back" => Action::Back,
            "left" => Action::Left,
            "right" => Action::Right,
            "around" => Action::Around,
            "pick" => Action::Pick,
            "face" => {
                let direction = words.next().ok_or(ScriptError::MissingArgument {
                    line,
                    word: "face".to_owned(),
                })?;
                Action::Face(direction.to_owned())
            }
            "steps" => {
                let value = words.next().ok_or(ScriptError::MissingArgument {
                    line,
                    word: "steps".to_owned(),
                })?;
                let steps = value.parse().map_err(|_| ScriptError::InvalidCount {
                    line,
                    value: value.to_owned(),
                })?;
                Action::Steps(steps)
            }
            other => {
                return Err(ScriptError::UnknownAction {
                    line,
                    word: other.to_owned(),
                })
            }
        };
        actions.push(action);
    }

    Ok(actions)
}
