use std::collections::HashMap;

use crate::allow_list::candidate_lines;
use crate::{UserName, ValidationError, ValidationReport, Validator};

/// Key under which a user's allow-list is stored.
pub const PREFERENCE_NAME: &str = "realme-urls";

/// A user-preference store.
pub trait PreferenceStore {
    /// Returns the stored value of `key` for `user`, or `default` if unset.
    fn get_option(&self, user: &UserName, key: &str, default: &str) -> String;
}

/// A preference store held in memory.
///
/// # Examples
///
/// ```
/// use realme::{InMemoryPreferences, PreferenceStore, UserName, PREFERENCE_NAME};
///
/// let alice = UserName::new("Alice").unwrap();
/// let mut prefs = InMemoryPreferences::new();
/// prefs.set_option(&alice, PREFERENCE_NAME, "https://a.example");
///
/// assert_eq!(prefs.get_option(&alice, PREFERENCE_NAME, ""), "https://a.example");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryPreferences {
    values: HashMap<(UserName, String), String>,
}

impl InMemoryPreferences {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` for `user`.
    pub fn set_option(&mut self, user: &UserName, key: &str, value: impl Into<String>) {
        self.values
            .insert((user.clone(), key.to_string()), value.into());
    }
}

impl PreferenceStore for InMemoryPreferences {
    fn get_option(&self, user: &UserName, key: &str, default: &str) -> String {
        self.values
            .get(&(user.clone(), key.to_string()))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

/// How a preference is rendered in the preferences form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// A multi-line text area.
    Textarea,
}

/// The allow-list field of the user preferences form.
///
/// Carries its presentation (type, section, messages, rows) and its
/// validation, with the URL limit and validator captured at construction.
///
/// # Examples
///
/// ```
/// use realme::{PreferenceField, StandardUrlParser, Validator, WikiTitleParser};
///
/// let urls = StandardUrlParser::new();
/// let titles = WikiTitleParser::new();
/// let field = PreferenceField::new(Validator::new(&urls, &titles), 5);
///
/// assert_eq!(field.rows(), 5);
/// assert!(field.validate(Some("https://a.example\n")).is_ok());
/// assert!(field.validate(Some("bananas\n")).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PreferenceField<'a> {
    validator: Validator<'a>,
    limit: usize,
}

impl<'a> PreferenceField<'a> {
    /// Creates the field for a per-user limit of `limit` URLs.
    pub fn new(validator: Validator<'a>, limit: usize) -> Self {
        Self { validator, limit }
    }

    /// Preference key the field is stored under.
    pub fn name(&self) -> &'static str {
        PREFERENCE_NAME
    }

    /// Input widget type.
    pub fn field_type(&self) -> FieldType {
        FieldType::Textarea
    }

    /// Preferences form section.
    pub fn section(&self) -> &'static str {
        "personal/userpage"
    }

    /// Message key of the field label.
    pub fn label_message(&self) -> &'static str {
        "realme-preference-desc"
    }

    /// Message key of the help text.
    pub fn help_message(&self) -> &'static str {
        "realme-preference-help"
    }

    /// Visible rows: the limit, capped at five.
    pub fn rows(&self) -> usize {
        self.limit.min(5)
    }

    /// Configured URL limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Validates a submitted value in a single pass.
    ///
    /// Every non-blank line is checked in order; the too-many error, if any,
    /// comes last. A missing value is treated as empty.
    pub fn validate(&self, value: Option<&str>) -> Result<(), Vec<ValidationError>> {
        let mut report = ValidationReport::new();
        let mut count = 0;

        for url in candidate_lines(value.unwrap_or_default()) {
            count += 1;
            report.extend(self.validator.check_url(url));
        }

        if count > self.limit {
            report.push(ValidationError::TooManyUrls { limit: self.limit });
        }

        if !report.is_ok() {
            tracing::info!(
                errors = report.len(),
                urls = count,
                "rejected rel=me preference value"
            );
        }

        report.into_result()
    }
}
