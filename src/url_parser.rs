//! URL parsing for allow-list validation.
//!
//! The validator only needs to know whether a string is a URL at all and,
//! if so, which scheme it uses. [`UrlParser`] is the seam a host plugs its
//! own URL rules into; [`StandardUrlParser`] is the stock implementation.

use url::Url;

/// Protocols recognized by [`StandardUrlParser::new`].
///
/// A string is only treated as a URL when it starts with one of these
/// (compared case-insensitively). `//` admits protocol-relative URLs.
pub const DEFAULT_PROTOCOLS: &[&str] = &[
    "bitcoin:",
    "ftp://",
    "ftps://",
    "geo:",
    "git://",
    "gopher://",
    "http://",
    "https://",
    "irc://",
    "ircs://",
    "magnet:",
    "mailto:",
    "matrix:",
    "mms://",
    "news:",
    "nntp://",
    "redis://",
    "sftp://",
    "sip:",
    "sips:",
    "sms:",
    "ssh://",
    "svn://",
    "tel:",
    "telnet://",
    "urn:",
    "worldwind://",
    "xmpp:",
    "//",
];

/// The structured result of parsing a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    scheme: String,
    delimiter: String,
    host: Option<String>,
    path: String,
}

impl ParsedUrl {
    /// Lower-case scheme, empty for protocol-relative URLs.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The delimiter following the scheme: `://`, `:` or `//`.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Scheme and delimiter together, as shown in error messages.
    pub fn scheme_with_delimiter(&self) -> String {
        format!("{}{}", self.scheme, self.delimiter)
    }

    /// Host, if the URL has an authority component.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns true for `http` and `https`.
    pub fn is_http(&self) -> bool {
        self.scheme == "http" || self.scheme == "https"
    }
}

/// A URL-parsing service.
///
/// Implementations return `None` when the input is not a URL (empty, no
/// scheme, malformed). They never panic.
pub trait UrlParser {
    /// Parses `raw` into its components.
    fn parse(&self, raw: &str) -> Option<ParsedUrl>;
}

/// URL parser backed by the `url` crate, restricted to a protocol list.
///
/// # Examples
///
/// ```
/// use realme::{StandardUrlParser, UrlParser};
///
/// let parser = StandardUrlParser::new();
///
/// let parsed = parser.parse("ftp://nyaa.example").expect("ftp is a known protocol");
/// assert_eq!(parsed.scheme_with_delimiter(), "ftp://");
///
/// let relative = parser.parse("//nyaa.example").expect("protocol-relative");
/// assert_eq!(relative.scheme(), "");
/// assert_eq!(relative.delimiter(), "//");
///
/// assert!(parser.parse("nyaa.example").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StandardUrlParser {
    protocols: Vec<String>,
}

impl StandardUrlParser {
    /// Creates a parser recognizing [`DEFAULT_PROTOCOLS`].
    pub fn new() -> Self {
        Self::with_protocols(DEFAULT_PROTOCOLS.iter().copied())
    }

    /// Creates a parser recognizing only the given protocols.
    ///
    /// Each entry is a scheme with its delimiter (`"https://"`, `"mailto:"`)
    /// or `"//"` for protocol-relative URLs.
    pub fn with_protocols<I, S>(protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protocols: protocols
                .into_iter()
                .map(|p| p.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Finds the longest recognized protocol that prefixes `raw`.
    fn match_protocol(&self, raw: &str) -> Option<&str> {
        self.protocols
            .iter()
            .filter(|p| {
                raw.get(..p.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(p))
            })
            .max_by_key(|p| p.len())
            .map(String::as_str)
    }
}

impl Default for StandardUrlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlParser for StandardUrlParser {
    fn parse(&self, raw: &str) -> Option<ParsedUrl> {
        let protocol = self.match_protocol(raw)?;

        if protocol == "//" {
            // Resolve the authority under a placeholder scheme; the result
            // still reports an empty scheme.
            let url = Url::parse(&format!("http:{raw}")).ok()?;
            let host = non_empty_host(&url)?;
            return Some(ParsedUrl {
                scheme: String::new(),
                delimiter: "//".to_string(),
                host: Some(host),
                path: url.path().to_string(),
            });
        }

        let (scheme, delimiter) = protocol.split_at(protocol.find(':')?);
        let url = Url::parse(raw).ok()?;
        let host = non_empty_host(&url);
        if delimiter == "://" && host.is_none() {
            return None;
        }

        Some(ParsedUrl {
            scheme: scheme.to_string(),
            delimiter: delimiter.to_string(),
            host,
            path: url.path().to_string(),
        })
    }
}

fn non_empty_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}
