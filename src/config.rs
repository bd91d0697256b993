use log::Level;
use serde::Deserialize;

use crate::error::Error;

/// Id of the optional `<script type="application/json">` element that
/// overrides the defaults below.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Tunables for every page behavior. Any subset can be overridden from
/// the page's JSON block; missing keys keep their default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub header_threshold: f64,
    pub back_to_top_threshold: f64,
    pub spy_offset: f64,
    pub fade_threshold: f64,
    pub nav_height_fallback: f64,
    pub submit_delay_ms: u32,
    pub newsletter_reset_ms: u32,
    pub pending_label: String,
    pub invalid_border: String,
    pub newsletter_success_html: String,
    pub newsletter_success_background: String,
    pub newsletter_thanks_placeholder: String,
    pub newsletter_placeholder: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            header_threshold: 60.0,
            back_to_top_threshold: 400.0,
            spy_offset: 100.0,
            fade_threshold: 0.12,
            nav_height_fallback: 72.0,
            submit_delay_ms: 1_200,
            newsletter_reset_ms: 3_000,
            pending_label: "Envoi en cours…".to_string(),
            invalid_border: "#e57373".to_string(),
            newsletter_success_html: "✓".to_string(),
            newsletter_success_background: "#4ade80".to_string(),
            newsletter_thanks_placeholder: "Merci pour votre inscription !".to_string(),
            newsletter_placeholder: "votre@email.fr".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the config block text if the page carries one. Broken JSON is
    /// logged and ignored so the page keeps working with defaults.
    pub fn from_page_text(text: Option<&str>) -> Self {
        match text.map(str::trim).filter(|t| !t.is_empty()) {
            None => Self::default(),
            Some(raw) => Self::from_json(raw).unwrap_or_else(|err| {
                log::warn!("Ignoring #{}: {}", CONFIG_ELEMENT_ID, err);
                Self::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_site() {
        let config = SiteConfig::default();
        assert_eq!(config.header_threshold, 60.0);
        assert_eq!(config.back_to_top_threshold, 400.0);
        assert_eq!(config.spy_offset, 100.0);
        assert_eq!(config.fade_threshold, 0.12);
        assert_eq!(config.submit_delay_ms, 1_200);
        assert_eq!(config.newsletter_reset_ms, 3_000);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SiteConfig::from_json(r#"{"submit_delay_ms": 50, "pending_label": "Sending…"}"#)
            .unwrap();
        assert_eq!(config.submit_delay_ms, 50);
        assert_eq!(config.pending_label, "Sending…");
        assert_eq!(config.header_threshold, 60.0);
    }

    #[test]
    fn broken_block_falls_back_to_defaults() {
        assert_eq!(SiteConfig::from_page_text(Some("{not json")), SiteConfig::default());
        assert_eq!(SiteConfig::from_page_text(Some("   ")), SiteConfig::default());
        assert_eq!(SiteConfig::from_page_text(None), SiteConfig::default());
    }
}
