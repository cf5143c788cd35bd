use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::field::{EventRecord, Field};
use crate::mask::{MaskState, PhoneMask};

/// One interaction with a masked field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Focus,
    Blur,
    Type(String),
    Paste(String),
    Backspace(usize),
    Delete(usize),
    Cursor(usize),
    Home,
    End,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Focus => write!(f, "focus"),
            Self::Blur => write!(f, "blur"),
            Self::Type(text) => write!(f, "type {text}"),
            Self::Paste(text) => write!(f, "paste {text}"),
            Self::Backspace(n) => write!(f, "bs {n}"),
            Self::Delete(n) => write!(f, "del {n}"),
            Self::Cursor(n) => write!(f, "cursor {n}"),
            Self::Home => write!(f, "home"),
            Self::End => write!(f, "end"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script is empty")]
    Empty,

    #[error("step {step}: unknown action '{action}'")]
    UnknownAction { step: usize, action: String },

    #[error("step {step}: '{action}' needs an argument")]
    MissingArgument { step: usize, action: String },

    #[error("step {step}: invalid count '{value}' for '{action}'")]
    InvalidCount {
        step: usize,
        action: String,
        value: String,
    },

    #[error("step {step}: '{action}' takes no argument")]
    UnexpectedArgument { step: usize, action: String },
}

/// Parses a keystroke script.
///
/// Steps are separated by `;` or newlines. Lines starting with `#` are
/// comments. Step numbers in errors count non-empty steps from 1.
pub fn parse_script(source: &str) -> Result<Vec<Action>, ScriptError> {
    let mut actions = Vec::new();
    let steps = source
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split(';'))
        .map(str::trim)
        .filter(|step| !step.is_empty());

    for (idx, step) in steps.enumerate() {
        actions.push(parse_step(idx + 1, step)?);
    }
    if actions.is_empty() {
        return Err(ScriptError::Empty);
    }
    Ok(actions)
}

fn parse_step(step: usize, raw: &str) -> Result<Action, ScriptError> {
    let (keyword, arg) = match raw.split_once(char::is_whitespace) {
        Some((k, rest)) => (k, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (raw, None),
    };
    let keyword = keyword.to_ascii_lowercase();

    let no_arg = |action: Action| match arg {
        Some(_) => Err(ScriptError::UnexpectedArgument {
            step,
            action: keyword.clone(),
        }),
        None => Ok(action),
    };
    let text = || {
        arg.map(str::to_string)
            .ok_or_else(|| ScriptError::MissingArgument {
                step,
                action: keyword.clone(),
            })
    };
    let count = |default: Option<usize>| match arg {
        Some(value) => value.parse::<usize>().map_err(|_| ScriptError::InvalidCount {
            step,
            action: keyword.clone(),
            value: value.to_string(),
        }),
        None => default.ok_or_else(|| ScriptError::MissingArgument {
            step,
            action: keyword.clone(),
        }),
    };

    match keyword.as_str() {
        "focus" => no_arg(Action::Focus),
        "blur" => no_arg(Action::Blur),
        "home" => no_arg(Action::Home),
        "end" => no_arg(Action::End),
        "type" => text().map(Action::Type),
        "paste" => text().map(Action::Paste),
        "bs" | "backspace" => count(Some(1)).map(Action::Backspace),
        "del" | "delete" => count(Some(1)).map(Action::Delete),
        "cursor" => count(None).map(Action::Cursor),
        _ => Err(ScriptError::UnknownAction {
            step,
            action: keyword.clone(),
        }),
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StepRecord {
    pub step: usize,
    pub action: String,
    pub value: String,
    pub cursor: usize,
    pub state: MaskState,
    /// At least one keystroke of the step was cancelled by the mask.
    pub suppressed: bool,
    /// Mask events dispatched while the step ran, oldest first.
    #[serde(skip)]
    pub events: Vec<EventRecord>,
}

/// Replays `actions` on a fresh, empty field.
pub fn run_script(mask: &PhoneMask, actions: &[Action]) -> Vec<StepRecord> {
    let mut field = Field::new(mask);
    run_script_on(&mut field, actions)
}

pub fn run_script_on(field: &mut Field<'_>, actions: &[Action]) -> Vec<StepRecord> {
    let mut records = Vec::with_capacity(actions.len());
    field.take_events();
    for (idx, action) in actions.iter().enumerate() {
        let suppressed = match action {
            Action::Focus => {
                field.focus();
                false
            }
            Action::Blur => {
                field.blur();
                false
            }
            Action::Type(text) => field.type_str(text) < text.chars().count(),
            Action::Paste(text) => !field.paste(text),
            Action::Backspace(n) => repeat_edit(field, *n, Field::backspace),
            Action::Delete(n) => repeat_edit(field, *n, Field::delete),
            Action::Cursor(n) => {
                field.set_cursor(*n);
                false
            }
            Action::Home => {
                field.set_cursor(0);
                false
            }
            Action::End => {
                field.set_cursor(usize::MAX);
                false
            }
        };
        records.push(StepRecord {
            step: idx + 1,
            action: action.to_string(),
            value: field.value().to_string(),
            cursor: field.cursor(),
            state: field.state(),
            suppressed,
            events: field.take_events(),
        });
    }
    records
}

// Presses an editing key up to `times` times, stopping at the first press
// that is suppressed or changes nothing.
fn repeat_edit<'m>(field: &mut Field<'m>, times: usize, press: fn(&mut Field<'m>) -> bool) -> bool {
    for _ in 0..times {
        let value = field.value().to_string();
        let cursor = field.cursor();
        if !press(field) {
            return true;
        }
        if field.value() == value && field.cursor() == cursor {
            break;
        }
    }
    false
}
