use crate::mask::{EventKind, KeyState, MaskEvent, MaskState, Masked, PhoneMask, KEY_BACKSPACE, KEY_DELETE};

/// Key code a browser reports for Ctrl+V.
const KEY_V: u16 = 86;

/// Best-effort keyCode for a typed character.
pub fn key_code_for(ch: char) -> u16 {
    match ch {
        '0'..='9' | 'A'..='Z' | ' ' => ch as u16,
        'a'..='z' => ch.to_ascii_uppercase() as u16,
        _ => 0,
    }
}

/// One dispatched mask event and what it did to the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub key_code: Option<u16>,
    pub before: String,
    pub after: String,
    pub suppressed: bool,
}

/// An input field bound to a [`PhoneMask`].
///
/// Mirrors what a UI layer does with a real text input: every keystroke is
/// masked on keydown, the default edit runs unless the mask suppresses it,
/// then the resulting input event is masked again. Rewriting the value puts
/// the cursor at the end.
#[derive(Clone, Debug)]
pub struct Field<'m> {
    mask: &'m PhoneMask,
    value: String,
    cursor: usize,
    keys: KeyState,
    events: Vec<EventRecord>,
}

impl<'m> Field<'m> {
    pub fn new(mask: &'m PhoneMask) -> Self {
        Self::with_value(mask, "")
    }

    pub fn with_value(mask: &'m PhoneMask, value: &str) -> Self {
        Self {
            mask,
            value: value.to_string(),
            cursor: value.chars().count(),
            keys: KeyState::default(),
            events: Vec::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn keys(&self) -> KeyState {
        self.keys
    }

    pub fn state(&self) -> MaskState {
        self.mask.state(&self.value)
    }

    /// Drains the events dispatched since the last call.
    pub fn take_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.len());
    }

    pub fn focus(&mut self) {
        self.dispatch(MaskEvent::focus());
    }

    pub fn blur(&mut self) {
        self.dispatch(MaskEvent::blur());
    }

    /// Types one character. Returns false when the keystroke was suppressed.
    pub fn type_char(&mut self, ch: char) -> bool {
        if self.dispatch(MaskEvent::keydown(key_code_for(ch))).suppress_default {
            return false;
        }
        self.insert(&ch.to_string());
        self.dispatch(MaskEvent::input());
        true
    }

    /// Types `text` one character at a time and returns how many keystrokes
    /// went through.
    pub fn type_str(&mut self, text: &str) -> usize {
        let mut applied = 0;
        for ch in text.chars() {
            if self.type_char(ch) {
                applied += 1;
            }
        }
        applied
    }

    pub fn paste(&mut self, text: &str) -> bool {
        if self.dispatch(MaskEvent::keydown(KEY_V)).suppress_default {
            return false;
        }
        self.insert(text);
        self.dispatch(MaskEvent::input());
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.dispatch(MaskEvent::keydown(KEY_BACKSPACE)).suppress_default {
            return false;
        }
        if self.cursor == 0 {
            return true;
        }
        let mut chars: Vec<char> = self.value.chars().collect();
        chars.remove(self.cursor - 1);
        self.value = chars.into_iter().collect();
        self.cursor -= 1;
        self.dispatch(MaskEvent::input());
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.dispatch(MaskEvent::keydown(KEY_DELETE)).suppress_default {
            return false;
        }
        if self.cursor >= self.len() {
            return true;
        }
        let mut chars: Vec<char> = self.value.chars().collect();
        chars.remove(self.cursor);
        self.value = chars.into_iter().collect();
        self.dispatch(MaskEvent::input());
        true
    }

    // Edits never land inside the protected prefix.
    fn insert(&mut self, text: &str) {
        let at = self
            .cursor
            .max(self.mask.protected_len())
            .min(self.len());
        let chars: Vec<char> = self.value.chars().collect();
        let count = text.chars().count();
        let mut edited: String = chars[..at].iter().collect();
        edited.push_str(text);
        edited.extend(&chars[at..]);
        self.value = edited;
        self.cursor = at + count;
    }

    fn dispatch(&mut self, event: MaskEvent) -> Masked {
        let masked = self
            .mask
            .apply(event, &self.value, self.cursor, &mut self.keys);
        self.events.push(EventRecord {
            kind: event.kind,
            key_code: event.key_code,
            before: self.value.clone(),
            after: masked.value.clone(),
            suppressed: masked.suppress_default,
        });
        if masked.value != self.value {
            self.value = masked.value.clone();
            self.cursor = self.len();
        }
        masked
    }
}
