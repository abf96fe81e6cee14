//! Sitewide allow-lists keyed by canonical page title.
//!
//! The config page holds a JSON object mapping titles to a URL or a list of
//! URLs:
//!
//! ```json
//! {
//!     "Main Page": "https://social.example/@wiki",
//!     "Project:About": ["https://code.example/wiki", "https://wiki.example"]
//! }
//! ```
//!
//! Saving the page is fail-closed ([`validate_site_config`]); reading it at
//! render time is fail-open ([`SiteConfig::from_json_str`] errors are turned
//! into an empty allow-list by the annotator).

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::allow_list::json_candidates;
use crate::{AllowList, Title, ValidationError, ValidationReport, Validator};

/// Parsed sitewide config: canonical title to allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteConfig {
    pages: IndexMap<String, AllowList>,
}

impl SiteConfig {
    /// Parses the config page content.
    ///
    /// The whole document is rejected if it is not a JSON object whose values
    /// are URLs or lists of URLs. Keys are taken as written.
    ///
    /// # Errors
    ///
    /// Returns a `malformed-config-document` error describing the first
    /// structural problem.
    ///
    /// # Examples
    ///
    /// ```
    /// use realme::SiteConfig;
    ///
    /// let config = SiteConfig::from_json_str(r#"{"Main Page": "https://a.example"}"#).unwrap();
    /// assert!(config.allow_list("Main Page").contains("https://a.example"));
    /// assert!(config.allow_list("Other").is_empty());
    ///
    /// assert!(SiteConfig::from_json_str("[1, 2]").is_err());
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ValidationError> {
        let document = parse_document(text)?;

        let mut pages = IndexMap::with_capacity(document.len());
        for (key, value) in &document {
            let list = AllowList::from_json(value).ok_or_else(|| malformed_value(key))?;
            pages.insert(key.clone(), list);
        }

        Ok(Self { pages })
    }

    /// The allow-list for an exact canonical title, empty when absent.
    pub fn allow_list(&self, canonical_title: &str) -> AllowList {
        self.pages
            .get(canonical_title)
            .cloned()
            .unwrap_or_default()
    }

    /// The allow-list for a title, looked up by its prefixed text.
    pub fn allow_list_for(&self, title: &Title) -> AllowList {
        self.allow_list(&title.prefixed_text())
    }

    /// Number of configured pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if no pages are configured.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Configured titles, in document order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }
}

/// Supplies the current content of the sitewide config page.
pub trait SiteConfigSource {
    /// Returns the config page's JSON text, or `None` if the page does not exist.
    fn load(&self) -> Option<String>;
}

/// A config source with fixed content.
#[derive(Debug, Clone, Default)]
pub struct StaticSiteConfig {
    content: Option<String>,
}

impl StaticSiteConfig {
    /// A source whose config page holds `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// A source whose config page does not exist.
    pub fn missing() -> Self {
        Self { content: None }
    }
}

impl SiteConfigSource for StaticSiteConfig {
    fn load(&self) -> Option<String> {
        self.content.clone()
    }
}

/// Validates config page content before it is saved.
///
/// A document that is not a JSON object yields a single
/// `malformed-config-document` error. Otherwise every key is checked as a
/// title and every URL under it as a URL; a value that is neither a URL nor a
/// list of URLs is malformed. Errors accumulate across all keys, in document
/// order.
///
/// # Examples
///
/// ```
/// use realme::{validate_site_config, StandardUrlParser, ValidationErrorKind, Validator, WikiTitleParser};
///
/// let urls = StandardUrlParser::new();
/// let titles = WikiTitleParser::new();
/// let validator = Validator::new(&urls, &titles);
///
/// let report = validate_site_config(r#"{"nyaa": ["ftp://a.example"]}"#, &validator);
/// assert!(report.contains_kind(ValidationErrorKind::NonCanonicalTitle));
/// assert!(report.contains_kind(ValidationErrorKind::NonHttpScheme));
/// ```
pub fn validate_site_config(text: &str, validator: &Validator<'_>) -> ValidationReport {
    let mut report = ValidationReport::new();

    let document = match parse_document(text) {
        Ok(document) => document,
        Err(error) => {
            report.push(error);
            return report;
        }
    };

    for (key, value) in &document {
        report.extend(validator.check_title(key));

        match json_candidates(value) {
            Some(urls) => {
                for url in urls {
                    report.extend(validator.check_url(url));
                }
            }
            None => report.push(malformed_value(key)),
        }
    }

    report
}

/// Parses the document and requires a top-level object.
fn parse_document(text: &str) -> Result<Map<String, Value>, ValidationError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::MalformedConfigDocument {
            reason: e.to_string(),
        })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ValidationError::MalformedConfigDocument {
            reason: format!("expected a JSON object, found {}", json_type_name(&other)),
        }),
    }
}

fn malformed_value(key: &str) -> ValidationError {
    ValidationError::MalformedConfigDocument {
        reason: format!("value for {key} must be a URL or a list of URLs"),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
