//! Helper functions shared by the content model, templates and server

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;

use chrono::{DateTime, FixedOffset, Locale};
use chrono_tz::Tz;

use crate::config::SiteConfig;

/// Locale-aware helpers bound to the site configuration
#[derive(Debug, Clone, Copy)]
pub struct Helpers {
    locale: Locale,
    timezone: Tz,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            locale: resolve_locale(&config.language),
            timezone: resolve_timezone(&config.timezone),
        }
    }

    /// Format a publication date for display; a missing date renders empty
    pub fn date(&self, date: Option<&DateTime<FixedOffset>>) -> String {
        date.map(|date| format_post_date(date, self.locale, self.timezone))
            .unwrap_or_default()
    }
}
