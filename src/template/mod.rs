use itertools::Itertools;
use regex::Regex;
use thiserror::Error;

pub const DEFAULT_TEMPLATE: &str = "+7 (___) ___ ____";
pub const DEFAULT_PLACEHOLDER: char = '_';

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("template '{template}' has no '{placeholder}' placeholder")]
    NoPlaceholder { template: String, placeholder: char },

    #[error("placeholder '{placeholder}' must not be a digit")]
    PlaceholderIsDigit { placeholder: char },

    #[error("failed to build validator for prefix '{prefix}': {source}")]
    Regex {
        prefix: String,
        #[source]
        source: regex::Error,
    },
}

/// A parsed mask template such as `+7 (___) ___ ____`.
///
/// Every prefix of the template gets an anchored validator up front, so the
/// formatter never compiles a regex while handling an event.
#[derive(Clone, Debug)]
pub struct Template {
    source: String,
    chars: Vec<char>,
    placeholder: char,
    first_placeholder: usize,
    capacity: usize,
    validators: Vec<Regex>,
}

impl Template {
    pub fn parse(pattern: &str, placeholder: char) -> Result<Self, TemplateError> {
        if pattern.is_empty() {
            return Err(TemplateError::Empty);
        }
        if placeholder.is_ascii_digit() {
            return Err(TemplateError::PlaceholderIsDigit { placeholder });
        }
        let chars: Vec<char> = pattern.chars().collect();
        let first_placeholder = chars.iter().position(|c| *c == placeholder).ok_or_else(|| {
            TemplateError::NoPlaceholder {
                template: pattern.to_string(),
                placeholder,
            }
        })?;
        let capacity = chars.iter().filter(|c| **c == placeholder).count();

        let mut validators = Vec::with_capacity(chars.len() + 1);
        for len in 0..=chars.len() {
            let prefix = &chars[..len];
            let re = Regex::new(&validator_pattern(prefix, placeholder)).map_err(|source| {
                TemplateError::Regex {
                    prefix: prefix.iter().collect(),
                    source,
                }
            })?;
            validators.push(re);
        }

        Ok(Self {
            source: pattern.to_string(),
            chars,
            placeholder,
            first_placeholder,
            capacity,
            validators,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    /// Number of fillable digit slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first_placeholder(&self) -> usize {
        self.first_placeholder
    }

    /// Literal text before the first placeholder, e.g. `+7 (`.
    pub fn fixed_prefix(&self) -> String {
        self.chars[..self.first_placeholder].iter().collect()
    }

    /// Digits embedded in the template itself, e.g. `7` for `+7 (___) ___ ____`.
    pub fn literal_digits(&self) -> String {
        self.chars.iter().filter(|c| c.is_ascii_digit()).collect()
    }

    pub fn literal_digit_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied().filter(|c| c.is_ascii_digit())
    }

    /// Checks `value` against the template prefix of the same length.
    ///
    /// Values longer than the template are checked against the whole
    /// template and therefore never match.
    pub fn validates(&self, value: &str) -> bool {
        let len = value.chars().count().min(self.chars.len());
        self.validators[len].is_match(value)
    }
}

fn validator_pattern(prefix: &[char], placeholder: char) -> String {
    let mut pattern = String::from("^");
    for (run, ch) in prefix.iter().dedup_with_count() {
        if *ch == placeholder {
            pattern.push_str(&format!("[0-9]{{1,{run}}}"));
        } else {
            pattern.push_str(&regex::escape(&ch.to_string()).repeat(run));
        }
    }
    pattern.push('$');
    pattern
}

#[cfg(test)]
mod template_tests {
    use super::*;

    #[test]
    fn collapses_placeholder_runs_and_escapes_literals() {
        let chars: Vec<char> = "+7 (___) ___".chars().collect();
        assert_eq!(
            validator_pattern(&chars, '_'),
            r"^\+7 \([0-9]{1,3}\) [0-9]{1,3}$"
        );
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let err = Template::parse("+7 (999)", '_').unwrap_err();
        assert!(matches!(err, TemplateError::NoPlaceholder { .. }));
        assert!(matches!(
            Template::parse("", '_').unwrap_err(),
            TemplateError::Empty
        ));
        assert!(matches!(
            Template::parse("+7 (___)", '7').unwrap_err(),
            TemplateError::PlaceholderIsDigit { .. }
        ));
    }

    #[test]
    fn exposes_template_shape() {
        let t = Template::parse(DEFAULT_TEMPLATE, DEFAULT_PLACEHOLDER).unwrap();
        assert_eq!(t.capacity(), 10);
        assert_eq!(t.first_placeholder(), 4);
        assert_eq!(t.fixed_prefix(), "+7 (");
        assert_eq!(t.literal_digits(), "7");
        assert_eq!(t.literal_digit_at(1), Some('7'));
        assert_eq!(t.literal_digit_at(0), None);
    }

    #[test]
    fn validates_partial_values_by_prefix() {
        let t = Template::parse(DEFAULT_TEMPLATE, DEFAULT_PLACEHOLDER).unwrap();
        assert!(t.validates(""));
        assert!(t.validates("+7 ("));
        assert!(t.validates("+7 (91"));
        assert!(t.validates("+7 (912) 345 6789"));
        assert!(!t.validates("+7 (9a"));
        assert!(!t.validates("+7 9"));
        assert!(!t.validates("+7 (912) 345 67890"));
    }
}
