use crate::{
    validate_site_config, LinkAnnotator, OutboundLink, PageLinkSet, PreferenceField,
    PreferenceStore, RealMeConfig, SiteConfigSource, StandardUrlParser, Title, TitleParser,
    UrlParser, ValidationError, Validator, WikiTitleParser,
};

/// The surfaces a host wires into its preference form, page output and
/// page-save pipelines.
///
/// Settings and collaborators are passed in explicitly; nothing is looked up
/// globally.
///
/// # Examples
///
/// ```
/// use realme::{
///     Hooks, InMemoryPreferences, Namespace, OutboundLink, RealMeConfig, StaticSiteConfig,
///     TitleParser, UserName, PREFERENCE_NAME,
/// };
///
/// let mut prefs = InMemoryPreferences::new();
/// prefs.set_option(&UserName::new("Alice").unwrap(), PREFERENCE_NAME, "https://alice.example");
/// let site = StaticSiteConfig::missing();
///
/// let hooks = Hooks::new(RealMeConfig::default(), &prefs, &site);
/// let title = hooks.titles().parse("User:Alice", Namespace::Main).unwrap();
///
/// let mut links = vec![OutboundLink::new("https://alice.example")];
/// hooks.on_output_page(&title, &mut links);
/// assert!(links[0].has_rel("me"));
/// ```
pub struct Hooks<'a> {
    config: RealMeConfig,
    urls: Box<dyn UrlParser + 'a>,
    titles: Box<dyn TitleParser + 'a>,
    preferences: &'a dyn PreferenceStore,
    site_config: &'a dyn SiteConfigSource,
}

impl<'a> Hooks<'a> {
    /// Creates hooks using the stock URL and title parsers.
    pub fn new(
        config: RealMeConfig,
        preferences: &'a dyn PreferenceStore,
        site_config: &'a dyn SiteConfigSource,
    ) -> Self {
        let titles = WikiTitleParser::with_capital_links(config.capital_links);
        Self {
            config,
            urls: Box::new(StandardUrlParser::new()),
            titles: Box::new(titles),
            preferences,
            site_config,
        }
    }

    /// Replaces the URL parser.
    pub fn with_url_parser(mut self, urls: impl UrlParser + 'a) -> Self {
        self.urls = Box::new(urls);
        self
    }

    /// Replaces the title parser.
    pub fn with_title_parser(mut self, titles: impl TitleParser + 'a) -> Self {
        self.titles = Box::new(titles);
        self
    }

    /// The active settings.
    pub fn config(&self) -> &RealMeConfig {
        &self.config
    }

    /// The title parser in use.
    pub fn titles(&self) -> &dyn TitleParser {
        self.titles.as_ref()
    }

    /// A validator over this instance's parsers.
    pub fn validator(&self) -> Validator<'_> {
        Validator::new(self.urls.as_ref(), self.titles.as_ref())
    }

    /// The allow-list field for the user preferences form.
    pub fn preference_field(&self) -> PreferenceField<'_> {
        PreferenceField::new(self.validator(), self.config.user_page_url_limit)
    }

    /// Marks the allow-listed outbound links of a rendered page.
    pub fn on_output_page(&self, title: &Title, links: &mut [OutboundLink]) -> PageLinkSet {
        LinkAnnotator::new(&self.config, self.preferences, self.site_config).decorate(title, links)
    }

    /// Vetoes saves of the sitewide config page that fail validation.
    ///
    /// Saves of any other page pass through unchecked.
    pub fn on_config_save(&self, title: &Title, content: &str) -> Result<(), Vec<ValidationError>> {
        let Some(config_page) = self.config.site_config_page.as_deref() else {
            return Ok(());
        };
        if title.prefixed_text() != config_page {
            return Ok(());
        }

        let report = validate_site_config(content, &self.validator());
        if !report.is_ok() {
            tracing::info!(
                page = %title,
                errors = report.len(),
                "rejected sitewide rel=me config save"
            );
        }
        report.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        InMemoryPreferences, Namespace, StaticSiteConfig, ValidationErrorKind, REL_ME,
    };

    #[test]
    fn preference_field_uses_configured_limit() {
        let prefs = InMemoryPreferences::new();
        let site = StaticSiteConfig::missing();
        let config = RealMeConfig {
            user_page_url_limit: 1,
            ..RealMeConfig::default()
        };
        let hooks = Hooks::new(config, &prefs, &site);

        let field = hooks.preference_field();

        assert_eq!(field.rows(), 1);
        let errors = field
            .validate(Some("https://a.example\nhttps://b.example"))
            .unwrap_err();
        assert_eq!(errors, vec![ValidationError::TooManyUrls { limit: 1 }]);
    }

    #[test]
    fn config_save_checks_only_the_config_page() {
        let prefs = InMemoryPreferences::new();
        let site = StaticSiteConfig::missing();
        let hooks = Hooks::new(RealMeConfig::default(), &prefs, &site);
        let config_page = hooks
            .titles()
            .parse("MediaWiki:RealMe.json", Namespace::Main)
            .unwrap();
        let other_page = hooks.titles().parse("Main Page", Namespace::Main).unwrap();

        assert!(hooks.on_config_save(&other_page, "not json").is_ok());

        let errors = hooks.on_config_save(&config_page, "not json").unwrap_err();
        assert_eq!(errors[0].kind(), ValidationErrorKind::MalformedConfigDocument);

        assert!(hooks
            .on_config_save(&config_page, r#"{"Main Page": "https://a.example"}"#)
            .is_ok());
    }

    #[test]
    fn config_save_passes_when_site_config_disabled() {
        let prefs = InMemoryPreferences::new();
        let site = StaticSiteConfig::missing();
        let config = RealMeConfig {
            site_config_page: None,
            ..RealMeConfig::default()
        };
        let hooks = Hooks::new(config, &prefs, &site);
        let page = hooks
            .titles()
            .parse("MediaWiki:RealMe.json", Namespace::Main)
            .unwrap();

        assert!(hooks.on_config_save(&page, "not json").is_ok());
    }

    #[test]
    fn capital_links_setting_reaches_title_validation() {
        let prefs = InMemoryPreferences::new();
        let site = StaticSiteConfig::missing();
        let config = RealMeConfig {
            capital_links: false,
            ..RealMeConfig::default()
        };
        let hooks = Hooks::new(config, &prefs, &site);

        assert!(hooks.validator().check_title("nyaa").is_empty());
    }

    #[test]
    fn custom_url_parser_is_used() {
        let prefs = InMemoryPreferences::new();
        let site = StaticSiteConfig::missing();
        let hooks = Hooks::new(RealMeConfig::default(), &prefs, &site)
            .with_url_parser(StandardUrlParser::with_protocols(["https://"]));

        assert_eq!(
            hooks.validator().check_url("http://a.example")[0].kind(),
            ValidationErrorKind::InvalidUrl
        );
    }

    #[test]
    fn output_page_uses_site_config() {
        let prefs = InMemoryPreferences::new();
        let site = StaticSiteConfig::new(r#"{"Main Page": "https://wiki.example"}"#);
        let hooks = Hooks::new(RealMeConfig::default(), &prefs, &site);
        let title = hooks.titles().parse("Main_Page", Namespace::Main).unwrap();

        let mut links = vec![OutboundLink::new("https://wiki.example")];
        let matched = hooks.on_output_page(&title, &mut links);

        assert_eq!(matched.len(), 1);
        assert!(links[0].has_rel(REL_ME));
    }
}
