//! Integration property tests for realme.
//!
//! These tests validate cross-module invariants of validation and
//! annotation using property-based testing.

use realme::{
    annotate, AllowList, Hooks, InMemoryPreferences, Namespace, OutboundLink, PageLinkSet,
    RealMeConfig, StandardUrlParser, StaticSiteConfig, TitleParser, UserName, ValidationErrorKind,
    Validator, WikiTitleParser, PREFERENCE_NAME, REL_ME,
};
use proptest::prelude::*;

// Strategy: well-formed http(s) URLs
fn arb_http_url() -> impl Strategy<Value = String> {
    prop::string::string_regex("https?://[a-z][a-z0-9]{0,10}\\.example(/[a-z0-9]{1,8}){0,2}")
        .unwrap()
}

// Strategy: URLs that parse but are not http(s)
fn arb_non_http_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("ftp://"), Just("mailto:"), Just("//"), Just("ssh://")],
        prop::string::string_regex("[a-z][a-z0-9]{0,10}\\.example").unwrap(),
    )
        .prop_map(|(scheme, host)| format!("{scheme}{host}"))
}

// Strategy: plausible user names
fn arb_user_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{2,10}").unwrap()
}

proptest! {
    /// Property: valid http(s) URLs produce no errors, every time
    #[test]
    fn proptest_http_urls_are_valid(url in arb_http_url()) {
        let urls = StandardUrlParser::new();
        let titles = WikiTitleParser::new();
        let validator = Validator::new(&urls, &titles);

        prop_assert!(validator.check_url(&url).is_empty());
        prop_assert_eq!(validator.check_url(&url), validator.check_url(&url));
    }

    /// Property: parseable non-http URLs are reported as such
    #[test]
    fn proptest_non_http_urls_are_rejected(url in arb_non_http_url()) {
        let urls = StandardUrlParser::new();
        let titles = WikiTitleParser::new();
        let validator = Validator::new(&urls, &titles);

        let errors = validator.check_url(&url);
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].kind(), ValidationErrorKind::NonHttpScheme);
    }

    /// Property: lower-casing the first letter of a canonical title makes it non-canonical
    #[test]
    fn proptest_lowercase_titles_are_non_canonical(name in arb_user_name()) {
        let urls = StandardUrlParser::new();
        let titles = WikiTitleParser::new();
        let validator = Validator::new(&urls, &titles);

        prop_assert!(validator.check_title(&name).is_empty());

        let lowered = name.to_lowercase();
        let errors = validator.check_title(&lowered);
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].kind(), ValidationErrorKind::NonCanonicalTitle);
    }

    /// Property: preference validation passes iff count is within the limit
    #[test]
    fn proptest_preference_limit(
        urls in prop::collection::vec(arb_http_url(), 0..10),
        blanks in 0usize..4,
        limit in 1usize..8
    ) {
        let prefs = InMemoryPreferences::new();
        let site = StaticSiteConfig::missing();
        let config = RealMeConfig { user_page_url_limit: limit, ..RealMeConfig::default() };
        let hooks = Hooks::new(config, &prefs, &site);

        let mut value = "\n".repeat(blanks);
        value.push_str(&urls.join("\n\n"));

        let result = hooks.preference_field().validate(Some(value.as_str()));
        if urls.len() <= limit {
            prop_assert!(result.is_ok());
        } else {
            let errors = result.unwrap_err();
            prop_assert_eq!(errors.len(), 1);
            prop_assert_eq!(errors[0].kind(), ValidationErrorKind::TooManyUrls);
        }
    }

    /// Property: annotation is the exact intersection and is repeatable
    #[test]
    fn proptest_annotate_intersection(
        page in prop::collection::vec(arb_http_url(), 0..8),
        allowed in prop::collection::vec(arb_http_url(), 0..8)
    ) {
        let page_set: PageLinkSet = page.iter().map(String::as_str).collect();
        let allow_list = AllowList::from_text(&allowed.join("\n"));

        let marked = annotate(&page_set, &allow_list);

        for url in page_set.iter() {
            prop_assert_eq!(marked.contains(url), allowed.iter().any(|a| a == url));
        }
        prop_assert_eq!(annotate(&page_set, &allow_list), marked);
    }

    /// Property: sub-pages of user pages never receive annotations
    #[test]
    fn proptest_user_subpages_never_annotated(
        name in arb_user_name(),
        sub in prop::string::string_regex("[A-Za-z0-9 ]{1,12}").unwrap(),
        urls in prop::collection::vec(arb_http_url(), 1..5)
    ) {
        let mut prefs = InMemoryPreferences::new();
        prefs.set_option(&UserName::new(&name).unwrap(), PREFERENCE_NAME, urls.join("\n"));
        let site = StaticSiteConfig::missing();
        let hooks = Hooks::new(RealMeConfig::default(), &prefs, &site);

        let raw = format!("User:{name}/{sub}");
        let Some(title) = hooks.titles().parse(&raw, Namespace::Main) else {
            return Ok(());
        };
        let mut links: Vec<_> = urls.iter().map(|u| OutboundLink::new(u.as_str())).collect();

        let matched = hooks.on_output_page(&title, &mut links);

        prop_assert!(matched.is_empty());
        prop_assert!(links.iter().all(|l| !l.has_rel(REL_ME)));
    }
}
