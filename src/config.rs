use serde::Deserialize;

use crate::ConfigError;

/// Runtime settings, named as in the host's configuration.
///
/// # Examples
///
/// ```
/// use realme::RealMeConfig;
///
/// let config = RealMeConfig::from_json_str(r#"{"RealMeUserPageUrlLimit": 3}"#).unwrap();
/// assert_eq!(config.user_page_url_limit, 3);
/// assert_eq!(config.site_config_page.as_deref(), Some("MediaWiki:RealMe.json"));
/// assert!(config.capital_links);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RealMeConfig {
    /// Most URLs a user may list in their preference.
    #[serde(rename = "RealMeUserPageUrlLimit")]
    pub user_page_url_limit: usize,
    /// Canonical title of the sitewide config page; `None` disables it.
    #[serde(rename = "RealMeSiteConfigPage")]
    pub site_config_page: Option<String>,
    /// Whether page titles capitalize their first letter.
    #[serde(rename = "RealMeCapitalLinks")]
    pub capital_links: bool,
}

impl Default for RealMeConfig {
    fn default() -> Self {
        Self {
            user_page_url_limit: 5,
            site_config_page: Some("MediaWiki:RealMe.json".to_string()),
            capital_links: true,
        }
    }
}

impl RealMeConfig {
    /// Loads settings from a JSON object; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the text is not valid JSON or a
    /// setting has the wrong type.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str(text)?;
        Ok(config)
    }

    /// Rows shown for the preference field: the limit, at most five.
    pub fn preference_rows(&self) -> usize {
        self.user_page_url_limit.min(5)
    }
}
