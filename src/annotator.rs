//! Deciding which outbound links of a rendered page get `rel="me"`.
//!
//! A page's allow-list comes from exactly one [`AllowListSource`], picked once
//! per page by [`classify`]. Links are matched by exact string equality; no
//! URL normalization is applied.

use std::fmt;

use indexmap::IndexSet;

use crate::{
    AllowList, PreferenceStore, RealMeConfig, SiteConfig, SiteConfigSource, Title, UserName,
    PREFERENCE_NAME,
};

/// The relation token added to matching links.
pub const REL_ME: &str = "me";

/// The distinct outbound URLs of one rendered page, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinkSet {
    urls: IndexSet<String>,
}

impl PageLinkSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the hrefs of a page's outbound links.
    pub fn from_links(links: &[OutboundLink]) -> Self {
        links.iter().map(|link| link.href.clone()).collect()
    }

    /// Adds a URL; returns false if it was already present.
    pub fn insert(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    /// True if `url` is in the set.
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of distinct URLs.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// True if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Iterates over the URLs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}

impl FromIterator<String> for PageLinkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for PageLinkSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

/// An external link found in rendered page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLink {
    href: String,
    rel: Vec<String>,
}

impl OutboundLink {
    /// A link with no relation tokens.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: Vec::new(),
        }
    }

    /// A link carrying existing relation tokens, e.g. `nofollow`.
    pub fn with_rel<I, S>(href: impl Into<String>, rel: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            href: href.into(),
            rel: rel.into_iter().map(Into::into).collect(),
        }
    }

    /// Link target.
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Relation tokens, in order.
    pub fn rel(&self) -> &[String] {
        &self.rel
    }

    /// True if the link carries `token`.
    pub fn has_rel(&self, token: &str) -> bool {
        self.rel.iter().any(|t| t == token)
    }

    /// Appends `token` unless already present; existing tokens are kept.
    ///
    /// Returns true if the token was added.
    pub fn add_rel(&mut self, token: &str) -> bool {
        if self.has_rel(token) {
            return false;
        }
        self.rel.push(token.to_string());
        true
    }
}

/// Exact-string intersection of a page's links with an allow-list.
///
/// The result keeps the page's link order.
///
/// # Examples
///
/// ```
/// use realme::{annotate, AllowList, PageLinkSet};
///
/// let links: PageLinkSet = ["https://a.example", "https://b.example"].into_iter().collect();
/// let allowed = AllowList::from_text("https://a.example");
///
/// let marked = annotate(&links, &allowed);
/// assert_eq!(marked.iter().collect::<Vec<_>>(), vec!["https://a.example"]);
/// ```
pub fn annotate(page_links: &PageLinkSet, allow_list: &AllowList) -> PageLinkSet {
    page_links
        .iter()
        .filter(|url| allow_list.contains(url))
        .collect()
}

/// Where a page's allow-list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowListSource {
    /// The stored preference of the user the page belongs to.
    UserPreference(UserName),
    /// The sitewide config entry for this canonical title.
    SiteConfig(String),
    /// The page gets no annotations.
    None,
}

impl fmt::Display for AllowListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserPreference(user) => write!(f, "user-preference({user})"),
            Self::SiteConfig(title) => write!(f, "sitewide-config({title})"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Picks the allow-list source for a page.
///
/// Sub-pages of personal pages never get annotations. A personal root page
/// owned by a valid user uses that user's preference; every other page uses
/// the sitewide config when one is configured.
///
/// # Examples
///
/// ```
/// use realme::{classify, AllowListSource, Namespace, RealMeConfig, TitleParser, WikiTitleParser};
///
/// let parser = WikiTitleParser::new();
/// let config = RealMeConfig::default();
///
/// let sandbox = parser.parse("User:Alice/Sandbox", Namespace::Main).unwrap();
/// assert_eq!(classify(&sandbox, &config), AllowListSource::None);
///
/// let main = parser.parse("Main Page", Namespace::Main).unwrap();
/// assert_eq!(
///     classify(&main, &config),
///     AllowListSource::SiteConfig("Main Page".to_string())
/// );
/// ```
pub fn classify(title: &Title, config: &RealMeConfig) -> AllowListSource {
    if title.namespace().is_personal() {
        if title.is_subpage() {
            return AllowListSource::None;
        }
        if let Some(user) = UserName::from_title(title) {
            return AllowListSource::UserPreference(user);
        }
    }

    if config.site_config_page.is_some() {
        AllowListSource::SiteConfig(title.prefixed_text())
    } else {
        AllowListSource::None
    }
}

/// Marks a rendered page's outbound links with `rel="me"`.
///
/// Reads allow-lists fresh on every call; nothing is cached.
pub struct LinkAnnotator<'a> {
    config: &'a RealMeConfig,
    preferences: &'a dyn PreferenceStore,
    site_config: &'a dyn SiteConfigSource,
}

impl<'a> LinkAnnotator<'a> {
    /// Creates an annotator over the given settings and stores.
    pub fn new(
        config: &'a RealMeConfig,
        preferences: &'a dyn PreferenceStore,
        site_config: &'a dyn SiteConfigSource,
    ) -> Self {
        Self {
            config,
            preferences,
            site_config,
        }
    }

    /// Loads the allow-list for a source.
    ///
    /// A missing or malformed sitewide config yields an empty list.
    pub fn allow_list(&self, source: &AllowListSource) -> AllowList {
        match source {
            AllowListSource::UserPreference(user) => {
                AllowList::from_text(&self.preferences.get_option(user, PREFERENCE_NAME, ""))
            }
            AllowListSource::SiteConfig(title) => {
                let Some(text) = self.site_config.load() else {
                    return AllowList::new();
                };
                match SiteConfig::from_json_str(&text) {
                    Ok(config) => config.allow_list(title),
                    Err(error) => {
                        tracing::warn!(
                            page = %title,
                            error = %error,
                            "ignoring unreadable sitewide rel=me config"
                        );
                        AllowList::new()
                    }
                }
            }
            AllowListSource::None => AllowList::new(),
        }
    }

    /// Adds `rel="me"` to every link of `title`'s page that is allow-listed.
    ///
    /// Returns the URLs that matched. Rendering never fails: any problem with
    /// the allow-list source results in no annotations.
    pub fn decorate(&self, title: &Title, links: &mut [OutboundLink]) -> PageLinkSet {
        if links.is_empty() {
            return PageLinkSet::new();
        }

        let source = classify(title, self.config);
        tracing::debug!(page = %title, source = %source, "classified page for rel=me");

        let allow_list = self.allow_list(&source);
        if allow_list.is_empty() {
            return PageLinkSet::new();
        }

        let matched = annotate(&PageLinkSet::from_links(links), &allow_list);
        for link in links.iter_mut().filter(|l| matched.contains(l.href())) {
            link.add_rel(REL_ME);
        }

        tracing::debug!(page = %title, annotated = matched.len(), "added rel=me links");
        matched
    }
}
