//! `rel="me"` link allow-lists for wiki pages.
//!
//! Users list the external profiles they own (a fediverse account, a code
//! forge, a personal site) in a preference; a sitewide JSON config page does
//! the same for any other page. When a page is rendered, every outbound link
//! that appears verbatim in the page's allow-list is marked with `rel="me"`,
//! so a third party can confirm the identity claim by checking for a link
//! back.
//!
//! This crate holds the logic with design content:
//! - **Validation**: [`Validator`] checks single URLs and titles; the
//!   [`PreferenceField`] and [`validate_site_config`] run whole passes and
//!   report every problem at once via [`ValidationReport`].
//! - **Annotation**: [`classify`] picks one [`AllowListSource`] per page and
//!   [`LinkAnnotator`] marks matching [`OutboundLink`]s.
//!
//! Host services are traits ([`UrlParser`], [`TitleParser`],
//! [`PreferenceStore`], [`SiteConfigSource`]) with stock implementations.
//! [`Hooks`] wires everything together.
//!
//! # Examples
//!
//! ```
//! use realme::{StandardUrlParser, Validator, ValidationErrorKind, WikiTitleParser};
//!
//! let urls = StandardUrlParser::new();
//! let titles = WikiTitleParser::new();
//! let validator = Validator::new(&urls, &titles);
//!
//! assert!(validator.check_url("https://social.example/@alice").is_empty());
//! assert_eq!(
//!     validator.check_url("nyaa.example")[0].kind(),
//!     ValidationErrorKind::InvalidUrl
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod allow_list;
mod annotator;
mod config;
mod error;
mod hooks;
mod preference;
mod site_config;
mod title;
mod url_parser;
mod validator;

#[cfg(test)]
mod test_utils;

pub use allow_list::AllowList;
pub use annotator::{
    annotate, classify, AllowListSource, LinkAnnotator, OutboundLink, PageLinkSet, REL_ME,
};
pub use config::RealMeConfig;
pub use error::{ConfigError, ValidationError, ValidationErrorKind, ValidationReport};
pub use hooks::Hooks;
pub use preference::{
    FieldType, InMemoryPreferences, PreferenceField, PreferenceStore, PREFERENCE_NAME,
};
pub use site_config::{validate_site_config, SiteConfig, SiteConfigSource, StaticSiteConfig};
pub use title::{Namespace, Title, TitleParser, UserName, WikiTitleParser};
pub use url_parser::{ParsedUrl, StandardUrlParser, UrlParser, DEFAULT_PROTOCOLS};
pub use validator::Validator;
