use crate::{Namespace, TitleParser, UrlParser, ValidationError};

/// Checks single URLs and page titles submitted for the allow-lists.
///
/// Both checks are pure: they hold no state and report every problem through
/// the returned list, which is empty when the value is acceptable. A check
/// stops at the first failing stage of its value (a URL that does not parse
/// is not also checked for its scheme).
///
/// # Examples
///
/// ```
/// use realme::{StandardUrlParser, ValidationErrorKind, Validator, WikiTitleParser};
///
/// let urls = StandardUrlParser::new();
/// let titles = WikiTitleParser::new();
/// let validator = Validator::new(&urls, &titles);
///
/// assert!(validator.check_url("https://nyaa.example").is_empty());
/// assert_eq!(
///     validator.check_url("ftp://nyaa.example")[0].kind(),
///     ValidationErrorKind::NonHttpScheme
/// );
/// assert_eq!(
///     validator.check_title("nyaa")[0].kind(),
///     ValidationErrorKind::NonCanonicalTitle
/// );
/// ```
#[derive(Clone, Copy)]
pub struct Validator<'a> {
    urls: &'a dyn UrlParser,
    titles: &'a dyn TitleParser,
}

impl<'a> Validator<'a> {
    /// Creates a validator over the given collaborator services.
    pub fn new(urls: &'a dyn UrlParser, titles: &'a dyn TitleParser) -> Self {
        Self { urls, titles }
    }

    /// Validates a single URL.
    ///
    /// Reports `invalid-url` when the value does not parse, otherwise
    /// `non-http-scheme` unless the scheme is `http` or `https`.
    pub fn check_url(&self, url: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let Some(parsed) = self.urls.parse(url) else {
            errors.push(ValidationError::InvalidUrl {
                url: url.to_string(),
            });
            return errors;
        };

        if !parsed.is_http() {
            errors.push(ValidationError::NonHttpScheme {
                url: url.to_string(),
                scheme: parsed.scheme_with_delimiter(),
            });
        }

        errors
    }

    /// Validates a single page title used as a config key.
    ///
    /// Reports `invalid-title` when the value is not a title, otherwise
    /// `non-canonical-title` unless it is already written in canonical form.
    /// Titles are never corrected.
    pub fn check_title(&self, title: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        match self.titles.parse(title, Namespace::Main) {
            Some(parsed) => {
                let canonical = parsed.prefixed_text();
                if canonical != title {
                    errors.push(ValidationError::NonCanonicalTitle {
                        canonical,
                        input: title.to_string(),
                    });
                }
            }
            None => errors.push(ValidationError::InvalidTitle {
                title: title.to_string(),
            }),
        }

        errors
    }
}

impl std::fmt::Debug for Validator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StandardUrlParser, ValidationErrorKind, WikiTitleParser};

    fn kinds(errors: &[ValidationError]) -> Vec<ValidationErrorKind> {
        errors.iter().map(|e| e.kind()).collect()
    }

    fn with_validator<R>(f: impl FnOnce(&Validator<'_>) -> R) -> R {
        let urls = StandardUrlParser::new();
        let titles = WikiTitleParser::new();
        f(&Validator::new(&urls, &titles))
    }

    #[test]
    fn check_url_rejects_unparseable_values() {
        with_validator(|v| {
            for value in ["", "nyaa", "nyaa.example"] {
                assert_eq!(
                    kinds(&v.check_url(value)),
                    vec![ValidationErrorKind::InvalidUrl],
                    "{value:?} should be invalid"
                );
            }
        });
    }

    #[test]
    fn check_url_rejects_non_http_schemes() {
        with_validator(|v| {
            let errors = v.check_url("ftp://nyaa.example");

            assert_eq!(
                errors,
                vec![ValidationError::NonHttpScheme {
                    url: "ftp://nyaa.example".to_string(),
                    scheme: "ftp://".to_string(),
                }]
            );
        });
    }

    #[test]
    fn check_url_rejects_mailto_and_protocol_relative() {
        with_validator(|v| {
            let errors = v.check_url("mailto:nyaa@nyaa.example");
            assert_eq!(kinds(&errors), vec![ValidationErrorKind::NonHttpScheme]);
            assert_eq!(errors[0].params()[1], "mailto:");

            let errors = v.check_url("//one.example.com");
            assert_eq!(kinds(&errors), vec![ValidationErrorKind::NonHttpScheme]);
            assert_eq!(errors[0].params()[1], "//");
        });
    }

    #[test]
    fn check_url_accepts_http_and_https() {
        with_validator(|v| {
            assert!(v.check_url("https://nyaa.example").is_empty());
            assert!(v.check_url("http://example.com").is_empty());
            assert!(v.check_url("https://social.example/@alice").is_empty());
        });
    }

    #[test]
    fn check_title_rejects_invalid_titles() {
        with_validator(|v| {
            for value in ["", "<<nyaa>>"] {
                assert_eq!(
                    v.check_title(value),
                    vec![ValidationError::InvalidTitle {
                        title: value.to_string()
                    }]
                );
            }
        });
    }

    #[test]
    fn check_title_reports_canonical_form() {
        with_validator(|v| {
            assert_eq!(
                v.check_title("nyaa"),
                vec![ValidationError::NonCanonicalTitle {
                    canonical: "Nyaa".to_string(),
                    input: "nyaa".to_string(),
                }]
            );
            assert_eq!(
                kinds(&v.check_title("User_talk:Alice")),
                vec![ValidationErrorKind::NonCanonicalTitle]
            );
        });
    }

    #[test]
    fn check_title_accepts_canonical_titles() {
        with_validator(|v| {
            assert!(v.check_title("Nyaa").is_empty());
            assert!(v.check_title("User:Alice").is_empty());
            assert!(v.check_title("Project talk:About").is_empty());
        });
    }

    #[test]
    fn checks_are_repeatable() {
        with_validator(|v| {
            assert_eq!(v.check_url("bananas"), v.check_url("bananas"));
            assert_eq!(v.check_title("nyaa"), v.check_title("nyaa"));
        });
    }

    mod proptests {
        use super::*;
        use crate::test_utils::{arb_http_url, arb_schemeless_text};
        use proptest::prelude::*;

        proptest! {
            /// Property: well-formed http(s) URLs always pass
            #[test]
            fn proptest_http_urls_pass(url in arb_http_url()) {
                with_validator(|v| {
                    prop_assert!(v.check_url(&url).is_empty(), "{} should pass", url);
                    Ok(())
                })?;
            }

            /// Property: text without a scheme is always an invalid URL
            #[test]
            fn proptest_schemeless_text_is_invalid(text in arb_schemeless_text()) {
                with_validator(|v| {
                    let errors = v.check_url(&text);
                    prop_assert_eq!(kinds(&errors), vec![ValidationErrorKind::InvalidUrl]);
                    Ok(())
                })?;
            }
        }
    }
}
