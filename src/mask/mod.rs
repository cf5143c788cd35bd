use serde::Serialize;
use thiserror::Error;

use crate::template::{Template, TemplateError, DEFAULT_PLACEHOLDER, DEFAULT_TEMPLATE};

pub const KEY_BACKSPACE: u16 = 8;
pub const KEY_DELETE: u16 = 46;

/// Key codes 48..=57 are the top-row digit keys.
pub fn is_digit_key(code: u16) -> bool {
    (48..=57).contains(&code)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    KeyDown,
    Input,
    Focus,
    Blur,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::Input => "input",
            Self::Focus => "focus",
            Self::Blur => "blur",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskEvent {
    pub kind: EventKind,
    pub key_code: Option<u16>,
}

impl MaskEvent {
    pub fn keydown(key_code: u16) -> Self {
        Self {
            kind: EventKind::KeyDown,
            key_code: Some(key_code),
        }
    }

    pub fn input() -> Self {
        Self {
            kind: EventKind::Input,
            key_code: None,
        }
    }

    pub fn focus() -> Self {
        Self {
            kind: EventKind::Focus,
            key_code: None,
        }
    }

    pub fn blur() -> Self {
        Self {
            kind: EventKind::Blur,
            key_code: None,
        }
    }

    fn is_keystroke(&self) -> bool {
        matches!(self.kind, EventKind::KeyDown | EventKind::Input)
    }
}

/// Per-field state that survives between events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    last_key_code: Option<u16>,
}

impl KeyState {
    pub fn last_key_code(&self) -> Option<u16> {
        self.last_key_code
    }

    fn observe(&mut self, event: &MaskEvent) {
        if let Some(code) = event.key_code {
            self.last_key_code = Some(code);
        }
    }

    fn digit_pressed(&self) -> bool {
        self.last_key_code.map(is_digit_key).unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Masked {
    pub value: String,
    /// The binding must cancel the browser's default action for the event.
    pub suppress_default: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskState {
    Empty,
    Incomplete,
    Complete,
}

impl MaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendering {
    /// The whole template with slots filled, unfilled slots left as placeholders.
    pub full: String,
    /// What the field shows: `full` cut at the first unfilled slot.
    pub display: String,
    /// Number of stream digits that found a slot.
    pub consumed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskConfig {
    pub template: String,
    pub placeholder: char,
    /// Cursor positions below this are guarded against deletion.
    pub protected_len: usize,
    /// Shortest value that survives blur.
    pub min_len: usize,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            placeholder: DEFAULT_PLACEHOLDER,
            protected_len: 3,
            min_len: 5,
        }
    }
}

impl MaskConfig {
    /// Derives the guard lengths from the template's fixed prefix.
    ///
    /// The protected region runs through the last literal digit of the prefix
    /// plus any spaces after it (`+7 ` for `+7 (___) ___ ____`). The minimum
    /// length is one past the first placeholder.
    pub fn for_template(template: &str) -> Self {
        Self::for_template_with(template, DEFAULT_PLACEHOLDER)
    }

    pub fn for_template_with(template: &str, placeholder: char) -> Self {
        let chars: Vec<char> = template.chars().collect();
        let first = chars
            .iter()
            .position(|c| *c == placeholder)
            .unwrap_or(chars.len());
        let prefix = &chars[..first];
        let protected_len = match prefix.iter().rposition(|c| c.is_ascii_digit()) {
            Some(last_digit) => {
                let spaces = prefix[last_digit + 1..]
                    .iter()
                    .take_while(|c| c.is_whitespace())
                    .count();
                last_digit + 1 + spaces
            }
            None => 0,
        };
        Self {
            template: template.to_string(),
            placeholder,
            protected_len,
            min_len: first + 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(
        "protected length {protected_len} reaches past the first placeholder at {first_placeholder}"
    )]
    ProtectedTooLong {
        protected_len: usize,
        first_placeholder: usize,
    },

    #[error("minimum length {min_len} is shorter than the protected length {protected_len}")]
    MinBelowProtected { min_len: usize, protected_len: usize },

    #[error("minimum length {min_len} leaves no room for a first digit (at most {max})")]
    MinPastFirstSlot { min_len: usize, max: usize },
}

/// Incremental phone-number formatter for a single template.
///
/// The formatter is immutable; everything that changes between events lives
/// in the caller's value, cursor and [`KeyState`].
#[derive(Clone, Debug)]
pub struct PhoneMask {
    template: Template,
    protected_len: usize,
    min_len: usize,
}

impl Default for PhoneMask {
    fn default() -> Self {
        let config = MaskConfig::default();
        Self {
            template: Template::parse(&config.template, config.placeholder)
                .unwrap_or_else(|e| unreachable!("default template is valid: {e}")),
            protected_len: config.protected_len,
            min_len: config.min_len,
        }
    }
}

impl PhoneMask {
    pub fn new(config: MaskConfig) -> Result<Self, ConfigError> {
        let template = Template::parse(&config.template, config.placeholder)?;
        if config.protected_len > template.first_placeholder() {
            return Err(ConfigError::ProtectedTooLong {
                protected_len: config.protected_len,
                first_placeholder: template.first_placeholder(),
            });
        }
        if config.min_len < config.protected_len {
            return Err(ConfigError::MinBelowProtected {
                min_len: config.min_len,
                protected_len: config.protected_len,
            });
        }
        // A shorter rendering is cut back to the prefix, so the first digit
        // has to survive at first_placeholder + 1.
        let max_min_len = template.first_placeholder() + 1;
        if config.min_len > max_min_len {
            return Err(ConfigError::MinPastFirstSlot {
                min_len: config.min_len,
                max: max_min_len,
            });
        }
        Ok(Self {
            template,
            protected_len: config.protected_len,
            min_len: config.min_len,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn protected_len(&self) -> usize {
        self.protected_len
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    pub fn capacity(&self) -> usize {
        self.template.capacity()
    }

    /// Extracts the digit stream from a field value.
    ///
    /// A digit sitting on the same literal digit of the template (the `7` in
    /// `+7 (`) belongs to the template and is skipped.
    pub fn digits(&self, value: &str) -> String {
        value
            .chars()
            .enumerate()
            .filter(|(i, c)| {
                c.is_ascii_digit() && self.template.literal_digit_at(*i) != Some(*c)
            })
            .map(|(_, c)| c)
            .collect()
    }

    /// Merges a digit stream into the template. Non-digits in `digits` are
    /// ignored and digits past capacity are dropped.
    pub fn render(&self, digits: &str) -> Rendering {
        let placeholder = self.template.placeholder();
        let mut stream = digits.chars().filter(|c| c.is_ascii_digit());
        let mut consumed = 0usize;
        let full: String = self
            .template
            .chars()
            .iter()
            .map(|ch| {
                if *ch != placeholder {
                    return *ch;
                }
                match stream.next() {
                    Some(d) => {
                        consumed += 1;
                        d
                    }
                    None => placeholder,
                }
            })
            .collect();

        let display = match full.chars().position(|c| c == placeholder) {
            Some(first_open) => {
                let cut = if first_open < self.min_len {
                    self.protected_len
                } else {
                    first_open
                };
                full.chars().take(cut).collect()
            }
            None => full.clone(),
        };

        Rendering {
            full,
            display,
            consumed,
        }
    }

    /// Display form of a digit stream.
    pub fn format(&self, digits: &str) -> String {
        self.render(digits).display
    }

    pub fn state(&self, value: &str) -> MaskState {
        if value.is_empty() {
            MaskState::Empty
        } else if self.digits(value).len() >= self.capacity() {
            MaskState::Complete
        } else {
            MaskState::Incomplete
        }
    }

    /// Handles one field event and returns the value the field must show.
    ///
    /// `value` is the field text before the event is processed and `cursor`
    /// the caret position in characters.
    pub fn apply(
        &self,
        event: MaskEvent,
        value: &str,
        cursor: usize,
        keys: &mut KeyState,
    ) -> Masked {
        keys.observe(&event);
        let len = value.chars().count();
        let cursor = cursor.min(len);

        if event.kind == EventKind::KeyDown
            && matches!(event.key_code, Some(KEY_BACKSPACE | KEY_DELETE))
            && cursor < self.protected_len
        {
            return Masked {
                value: value.to_string(),
                suppress_default: true,
            };
        }

        let rendering = self.render(&self.digits(value));
        let digit_typed = event.is_keystroke() && keys.digit_pressed();
        let mut next = if !self.template.validates(value) || len < self.min_len || digit_typed {
            rendering.display
        } else {
            value.to_string()
        };

        if event.kind == EventKind::Blur && next.chars().count() < self.min_len {
            next.clear();
        }

        Masked {
            value: next,
            suppress_default: false,
        }
    }
}
