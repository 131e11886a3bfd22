//! Locale type: a code that is guaranteed to be in the registry.

use crate::i18n::{LocaleConfig, LocaleRegistry, TextDirection};
use std::fmt;

/// A supported locale.
///
/// Only constructible through the registry, so every `Locale` has a complete
/// schema and catalog entry once the startup integrity check has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const ARABIC: Locale = Locale { code: "ar" };

    /// Map an arbitrary token to a supported locale.
    ///
    /// # Arguments
    /// * `raw` - Any string, typically the first URL path segment
    ///
    /// # Returns
    /// The locale whose code equals `raw` exactly, or the default locale.
    pub fn resolve(raw: &str) -> Locale {
        let registry = LocaleRegistry::get();
        let config = registry
            .get_by_code(raw)
            .unwrap_or_else(|| registry.default_locale());
        Locale { code: config.code }
    }

    /// Strict lookup used when reading sources, where an unknown code is not
    /// a request token but a deployment detail worth reporting.
    pub fn from_code(code: &str) -> Option<Locale> {
        LocaleRegistry::get()
            .get_by_code(code)
            .map(|config| Locale { code: config.code })
    }

    pub fn default_locale() -> Locale {
        Locale {
            code: LocaleRegistry::get().default_locale().code,
        }
    }

    /// All supported locales, in registry order.
    pub fn all() -> Vec<Locale> {
        LocaleRegistry::get()
            .list()
            .iter()
            .map(|config| Locale { code: config.code })
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// English name of the locale (e.g., "Arabic").
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn direction(&self) -> TextDirection {
        self.config().direction
    }

    fn config(&self) -> &'static LocaleConfig {
        let registry = LocaleRegistry::get();
        registry
            .get_by_code(self.code)
            .unwrap_or_else(|| registry.default_locale())
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::default_locale()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
