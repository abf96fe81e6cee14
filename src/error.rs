use std::fmt;

/// A single problem found while validating user-submitted URLs or titles.
///
/// Validation never fails by returning `Err` from a check: each check returns
/// a (possibly empty) list of these, and the caller decides pass/fail by
/// emptiness. Every variant carries the values needed to render a message.
///
/// # Examples
///
/// ```
/// use realme::{ValidationError, ValidationErrorKind};
///
/// let error = ValidationError::TooManyUrls { limit: 5 };
/// assert_eq!(error.kind(), ValidationErrorKind::TooManyUrls);
/// assert_eq!(error.message_key(), "realme-preference-error-too-many");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The value could not be parsed as a URL at all.
    #[error("{url} is not a valid URL")]
    InvalidUrl {
        /// The rejected value, verbatim.
        url: String,
    },
    /// The URL parsed but does not use `http://` or `https://`.
    #[error("{url} uses {scheme} instead of http:// or https://")]
    NonHttpScheme {
        /// The rejected value, verbatim.
        url: String,
        /// Scheme followed by its delimiter, e.g. `ftp://` or `//`.
        scheme: String,
    },
    /// The value is not a valid page title.
    #[error("{title} is not a valid page title")]
    InvalidTitle {
        /// The rejected value, verbatim.
        title: String,
    },
    /// The title is valid but not written in canonical form.
    #[error("{input} must be written as {canonical}")]
    NonCanonicalTitle {
        /// The canonical form the title must be written in.
        canonical: String,
        /// The submitted form.
        input: String,
    },
    /// More URLs were submitted than the configured limit allows.
    #[error("too many URLs, at most {limit} are allowed")]
    TooManyUrls {
        /// The configured limit.
        limit: usize,
    },
    /// The sitewide config document does not have the expected structure.
    #[error("malformed config document: {reason}")]
    MalformedConfigDocument {
        /// What was wrong with the document.
        reason: String,
    },
}

impl ValidationError {
    /// Returns the error kind.
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::InvalidUrl { .. } => ValidationErrorKind::InvalidUrl,
            Self::NonHttpScheme { .. } => ValidationErrorKind::NonHttpScheme,
            Self::InvalidTitle { .. } => ValidationErrorKind::InvalidTitle,
            Self::NonCanonicalTitle { .. } => ValidationErrorKind::NonCanonicalTitle,
            Self::TooManyUrls { .. } => ValidationErrorKind::TooManyUrls,
            Self::MalformedConfigDocument { .. } => ValidationErrorKind::MalformedConfigDocument,
        }
    }

    /// Returns the host localization key used to render this error.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "realme-preference-error-invalid",
            Self::NonHttpScheme { .. } => "realme-preference-error-not-http",
            Self::InvalidTitle { .. } => "realme-config-error-invalidtitle",
            Self::NonCanonicalTitle { .. } => "realme-config-error-canonical",
            Self::TooManyUrls { .. } => "realme-preference-error-too-many",
            Self::MalformedConfigDocument { .. } => "realme-config-error-malformed",
        }
    }

    /// Returns the message parameters, in the order the message expects them.
    ///
    /// ```
    /// use realme::ValidationError;
    ///
    /// let error = ValidationError::NonHttpScheme {
    ///     url: "ftp://nyaa.example".to_string(),
    ///     scheme: "ftp://".to_string(),
    /// };
    /// assert_eq!(error.params(), vec!["ftp://nyaa.example", "ftp://"]);
    /// ```
    pub fn params(&self) -> Vec<String> {
        match self {
            Self::InvalidUrl { url } => vec![url.clone()],
            Self::NonHttpScheme { url, scheme } => vec![url.clone(), scheme.clone()],
            Self::InvalidTitle { title } => vec![title.clone()],
            Self::NonCanonicalTitle { canonical, input } => vec![canonical.clone(), input.clone()],
            Self::TooManyUrls { limit } => vec![limit.to_string()],
            Self::MalformedConfigDocument { reason } => vec![reason.clone()],
        }
    }
}

/// Kind of validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// See [`ValidationError::InvalidUrl`].
    InvalidUrl,
    /// See [`ValidationError::NonHttpScheme`].
    NonHttpScheme,
    /// See [`ValidationError::InvalidTitle`].
    InvalidTitle,
    /// See [`ValidationError::NonCanonicalTitle`].
    NonCanonicalTitle,
    /// See [`ValidationError::TooManyUrls`].
    TooManyUrls,
    /// See [`ValidationError::MalformedConfigDocument`].
    MalformedConfigDocument,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "invalid-url"),
            Self::NonHttpScheme => write!(f, "non-http-scheme"),
            Self::InvalidTitle => write!(f, "invalid-title"),
            Self::NonCanonicalTitle => write!(f, "non-canonical-title"),
            Self::TooManyUrls => write!(f, "too-many-urls"),
            Self::MalformedConfigDocument => write!(f, "malformed-config-document"),
        }
    }
}

/// Accumulates errors across a whole validation pass.
///
/// Single-value checks stop at their first failing stage; a report collects
/// the results of every value in the pass so the submitter sees all problems
/// in one round-trip. Errors keep the order they were added in.
///
/// # Examples
///
/// ```
/// use realme::{ValidationError, ValidationReport};
///
/// let mut report = ValidationReport::new();
/// report.extend(vec![ValidationError::InvalidUrl { url: "nope".to_string() }]);
/// report.push(ValidationError::TooManyUrls { limit: 5 });
///
/// assert_eq!(report.len(), 2);
/// assert!(report.into_result().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Appends the errors of a single-value check.
    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    /// Returns true if nothing was reported.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of reported errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the reported errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns true if any reported error has the given kind.
    pub fn contains_kind(&self, kind: ValidationErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind() == kind)
    }

    /// Converts the report into a pass/fail result.
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Errors raised while loading runtime settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings document is not valid JSON or has the wrong shape.
    #[error("invalid RealMe settings: {0}")]
    Json(#[from] serde_json::Error),
}
