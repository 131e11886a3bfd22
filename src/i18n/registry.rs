//! Locale registry: Single source of truth for all supported locales.
//!
//! The registry is built once behind a `OnceLock` and is immutable thereafter.
//! Both the question schema and the message catalog must carry an entry for
//! every locale listed here.

use std::sync::OnceLock;

/// Writing direction of a locale, used for the `dir` attribute of rendered pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

impl TextDirection {
    /// Value of the HTML `dir` attribute.
    pub fn as_html(&self) -> &'static str {
        match self {
            TextDirection::LeftToRight => "ltr",
            TextDirection::RightToLeft => "rtl",
        }
    }
}

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Locale code as it appears in URLs and source files (e.g., "en", "ar")
    pub code: &'static str,

    /// English name of the locale
    pub name: &'static str,

    /// Writing direction
    pub direction: TextDirection,

    /// Whether unrecognized locale tokens resolve to this locale (exactly one)
    pub is_default: bool,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: supported_locales(),
        })
    }

    /// Get a locale configuration by exact code match.
    ///
    /// # Arguments
    /// * `code` - Locale code, compared case-sensitively (e.g., "ar")
    ///
    /// # Returns
    /// * `Some(&LocaleConfig)` if the locale is supported
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All supported locales.
    ///
    /// # Returns
    /// A slice of every locale configuration, in registry order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// The locale every unrecognized token falls back to.
    ///
    /// # Returns
    /// The entry marked `is_default`, or the first entry if none is marked.
    pub fn default_locale(&self) -> &LocaleConfig {
        self.locales
            .iter()
            .find(|locale| locale.is_default)
            .unwrap_or(&self.locales[0])
    }
}

/// Supported locales: English (default) and Arabic.
fn supported_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            direction: TextDirection::LeftToRight,
            is_default: true,
        },
        LocaleConfig {
            code: "ar",
            name: "Arabic",
            direction: TextDirection::RightToLeft,
            is_default: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LocaleRegistry::get();
        let registry2 = LocaleRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LocaleRegistry::get().get_by_code("en").unwrap();
        assert_eq!(config.name, "English");
        assert_eq!(config.direction, TextDirection::LeftToRight);
        assert!(config.is_default);
    }

    #[test]
    fn test_get_by_code_arabic() {
        let config = LocaleRegistry::get().get_by_code("ar").unwrap();
        assert_eq!(config.name, "Arabic");
        assert_eq!(config.direction.as_html(), "rtl");
        assert!(!config.is_default);
    }

    #[test]
    fn test_get_by_code_is_exact() {
        let registry = LocaleRegistry::get();
        assert!(registry.get_by_code("EN").is_none());
        assert!(registry.get_by_code(" en").is_none());
        assert!(registry.get_by_code("fr").is_none());
    }

    #[test]
    fn test_exactly_one_default() {
        let defaults = LocaleRegistry::get()
            .list()
            .iter()
            .filter(|locale| locale.is_default)
            .count();
        assert_eq!(defaults, 1);
        assert_eq!(LocaleRegistry::get().default_locale().code, "en");
    }
}
