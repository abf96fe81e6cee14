//! Page titles and the user identities derived from them.
//!
//! [`TitleParser`] is the seam for the host's title rules. [`WikiTitleParser`]
//! implements the stock wiki rules: namespace prefixes, first-letter
//! capitalization, whitespace normalization and the illegal-character set.

use std::fmt;
use std::net::IpAddr;

/// Characters that may never appear in a title.
const ILLEGAL_TITLE_CHARS: &[char] = &['<', '>', '[', ']', '|', '{', '}'];

/// Characters that may never appear in a user name.
const INVALID_USERNAME_CHARS: &[char] = &['@', ':', '>', '=', '/'];

/// Maximum title length in bytes (Special pages allow twice this).
const MAX_TITLE_BYTES: usize = 255;

/// A wiki namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `Special:`
    Special,
    /// The main (article) namespace, no prefix.
    Main,
    /// `Talk:`
    Talk,
    /// `User:`
    User,
    /// `User talk:`
    UserTalk,
    /// `Project:`
    Project,
    /// `Project talk:`
    ProjectTalk,
    /// `File:` (also reachable as `Image:`)
    File,
    /// `File talk:`
    FileTalk,
    /// `MediaWiki:`
    MediaWiki,
    /// `MediaWiki talk:`
    MediaWikiTalk,
    /// `Template:`
    Template,
    /// `Template talk:`
    TemplateTalk,
    /// `Help:`
    Help,
    /// `Help talk:`
    HelpTalk,
    /// `Category:`
    Category,
    /// `Category talk:`
    CategoryTalk,
}

impl Namespace {
    const ALL: [Namespace; 17] = [
        Namespace::Special,
        Namespace::Main,
        Namespace::Talk,
        Namespace::User,
        Namespace::UserTalk,
        Namespace::Project,
        Namespace::ProjectTalk,
        Namespace::File,
        Namespace::FileTalk,
        Namespace::MediaWiki,
        Namespace::MediaWikiTalk,
        Namespace::Template,
        Namespace::TemplateTalk,
        Namespace::Help,
        Namespace::HelpTalk,
        Namespace::Category,
        Namespace::CategoryTalk,
    ];

    /// Canonical prefix name, empty for the main namespace.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Namespace::Special => "Special",
            Namespace::Main => "",
            Namespace::Talk => "Talk",
            Namespace::User => "User",
            Namespace::UserTalk => "User talk",
            Namespace::Project => "Project",
            Namespace::ProjectTalk => "Project talk",
            Namespace::File => "File",
            Namespace::FileTalk => "File talk",
            Namespace::MediaWiki => "MediaWiki",
            Namespace::MediaWikiTalk => "MediaWiki talk",
            Namespace::Template => "Template",
            Namespace::TemplateTalk => "Template talk",
            Namespace::Help => "Help",
            Namespace::HelpTalk => "Help talk",
            Namespace::Category => "Category",
            Namespace::CategoryTalk => "Category talk",
        }
    }

    /// Resolves a prefix (case-insensitive, spaces already normalized).
    pub fn from_name(name: &str) -> Option<Namespace> {
        if name.eq_ignore_ascii_case("Image") {
            return Some(Namespace::File);
        }
        if name.eq_ignore_ascii_case("Image talk") {
            return Some(Namespace::FileTalk);
        }
        Self::ALL
            .into_iter()
            .filter(|ns| *ns != Namespace::Main)
            .find(|ns| ns.canonical_name().eq_ignore_ascii_case(name))
    }

    /// Whether pages in this namespace can have sub-pages.
    pub fn has_subpages(self) -> bool {
        !matches!(
            self,
            Namespace::Special | Namespace::Main | Namespace::File | Namespace::Category
        )
    }

    /// Whether pages in this namespace represent a specific user.
    pub fn is_personal(self) -> bool {
        matches!(self, Namespace::User | Namespace::UserTalk)
    }
}

/// A parsed, normalized page title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title {
    namespace: Namespace,
    text: String,
    fragment: Option<String>,
}

impl Title {
    /// The title's namespace.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Title text without namespace prefix, using spaces.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The `#fragment` part, if one was given.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The canonical, fully-prefixed form (fragment excluded).
    pub fn prefixed_text(&self) -> String {
        match self.namespace {
            Namespace::Main => self.text.clone(),
            ns => format!("{}:{}", ns.canonical_name(), self.text),
        }
    }

    /// True if this page is a sub-page of another page.
    pub fn is_subpage(&self) -> bool {
        self.namespace.has_subpages() && self.text.contains('/')
    }

    /// True if the title is in any of the given namespaces.
    pub fn in_namespaces(&self, namespaces: &[Namespace]) -> bool {
        namespaces.contains(&self.namespace)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefixed_text())
    }
}

/// A page-title service.
pub trait TitleParser {
    /// Parses `raw`, resolving unprefixed titles into `default_namespace`.
    ///
    /// Returns `None` when `raw` is not a valid title.
    fn parse(&self, raw: &str, default_namespace: Namespace) -> Option<Title>;
}

/// Title parser implementing the stock wiki title rules.
///
/// # Examples
///
/// ```
/// use realme::{Namespace, TitleParser, WikiTitleParser};
///
/// let parser = WikiTitleParser::new();
///
/// let title = parser.parse("user_talk:alice", Namespace::Main).unwrap();
/// assert_eq!(title.prefixed_text(), "User talk:Alice");
///
/// assert!(parser.parse("<<nyaa>>", Namespace::Main).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WikiTitleParser {
    capital_links: bool,
}

impl WikiTitleParser {
    /// Creates a parser that capitalizes the first letter of titles.
    pub fn new() -> Self {
        Self {
            capital_links: true,
        }
    }

    /// Creates a parser with explicit first-letter capitalization behavior.
    pub fn with_capital_links(capital_links: bool) -> Self {
        Self { capital_links }
    }

    fn capitalize_first(text: &str) -> String {
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for WikiTitleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleParser for WikiTitleParser {
    fn parse(&self, raw: &str, default_namespace: Namespace) -> Option<Title> {
        let mut text = normalize_whitespace(raw);
        let mut namespace = default_namespace;

        // A leading colon forces the main namespace.
        if let Some(rest) = text.strip_prefix(':') {
            namespace = Namespace::Main;
            text = rest.trim_start().to_string();
        }

        if text.is_empty() {
            return None;
        }

        if let Some((prefix, rest)) = text.split_once(':') {
            if let Some(ns) = Namespace::from_name(prefix.trim_end()) {
                namespace = ns;
                text = rest.trim_start().to_string();
            }
        }

        let mut fragment = None;
        if let Some(idx) = text.find('#') {
            fragment = Some(text[idx + 1..].to_string());
            text = text[..idx].trim_end().to_string();
        }

        if !is_legal_title_text(&text) {
            return None;
        }

        let max_bytes = if namespace == Namespace::Special {
            MAX_TITLE_BYTES * 2
        } else {
            MAX_TITLE_BYTES
        };
        if text.len() > max_bytes {
            return None;
        }

        if self.capital_links {
            text = Self::capitalize_first(&text);
        }

        Some(Title {
            namespace,
            text,
            fragment,
        })
    }
}

/// Maps underscores to spaces, collapses whitespace runs and trims.
fn normalize_whitespace(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}'))
        .map(|c| if c == '_' { ' ' } else { c })
        .collect::<String>()
        .split(|c: char| c == ' ' || c == '\u{00A0}' || c == '\u{3000}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_legal_title_text(text: &str) -> bool {
    if text.is_empty() || text.starts_with(':') {
        return false;
    }
    if text.chars().any(|c| ILLEGAL_TITLE_CHARS.contains(&c) || c.is_control()) {
        return false;
    }
    if contains_percent_escape(text) || contains_html_entity(text) {
        return false;
    }
    if text == "."
        || text == ".."
        || text.starts_with("./")
        || text.starts_with("../")
        || text.contains("/./")
        || text.contains("/../")
        || text.ends_with("/.")
        || text.ends_with("/..")
    {
        return false;
    }
    !text.contains("~~~")
}

fn contains_percent_escape(text: &str) -> bool {
    text.as_bytes()
        .windows(3)
        .any(|w| w[0] == b'%' && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit())
}

fn contains_html_entity(text: &str) -> bool {
    text.match_indices('&').any(|(idx, _)| {
        let rest = &text[idx + 1..];
        match rest.find(';') {
            Some(end) => {
                end > 0
                    && rest[..end]
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '#' || !c.is_ascii())
            }
            None => false,
        }
    })
}

/// The identity of a registered user, derived from their personal page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserName(String);

impl UserName {
    /// Validates `name` as a registered user's name.
    ///
    /// IP addresses and names containing `@ : > = /` are rejected.
    pub fn new(name: &str) -> Option<Self> {
        if name.is_empty() || name.contains(INVALID_USERNAME_CHARS) {
            return None;
        }
        if name.parse::<IpAddr>().is_ok() {
            return None;
        }
        Some(Self(name.to_string()))
    }

    /// Derives the user a personal page belongs to.
    ///
    /// Returns `None` for titles outside the personal namespaces, for
    /// sub-pages, and for names that are not valid user names.
    pub fn from_title(title: &Title) -> Option<Self> {
        if !title.namespace().is_personal() || title.is_subpage() {
            return None;
        }
        Self::new(title.text())
    }

    /// The user name as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
