use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// File name of the question schema inside the data directory
pub const QUESTIONS_FILE: &str = "questions.json";

/// File name of the message catalog inside the data directory
pub const MESSAGES_FILE: &str = "messages.json";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub listen_addr: SocketAddr,
    pub web_root: String,

    // Storage
    pub answers_directory: PathBuf,

    // Sources
    pub data_dir: PathBuf,
    pub templates_dir: Option<PathBuf>,
    pub cache_sources: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());

        Ok(Self {
            // Server
            listen_addr: listen_addr
                .parse()
                .with_context(|| format!("LISTEN_ADDR is not a socket address: {}", listen_addr))?,
            web_root: normalize_web_root(
                &std::env::var("WEB_ROOT").unwrap_or_else(|_| "/".to_string()),
            ),

            // Storage
            answers_directory: std::env::var("ANSWERS_DIRECTORY")
                .unwrap_or_else(|_| "questionnaire-answers".to_string())
                .into(),

            // Sources
            data_dir: std::env::var("QUESTIONNAIRE_DATA_DIR")
                .unwrap_or_else(|_| "/opt/questionnaire".to_string())
                .into(),
            templates_dir: std::env::var("QUESTIONNAIRE_TEMPLATES_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            cache_sources: std::env::var("QUESTIONNAIRE_CACHE")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
        })
    }

    /// Configuration rooted at the given directories, with defaults for the rest
    pub fn new(data_dir: impl Into<PathBuf>, answers_directory: impl Into<PathBuf>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8081)),
            web_root: "/".to_string(),
            answers_directory: answers_directory.into(),
            data_dir: data_dir.into(),
            templates_dir: None,
            cache_sources: true,
        }
    }

    pub fn questions_path(&self) -> PathBuf {
        self.data_dir.join(QUESTIONS_FILE)
    }

    pub fn messages_path(&self) -> PathBuf {
        self.data_dir.join(MESSAGES_FILE)
    }
}

/// Web root always starts and ends with a slash so links can be appended directly
fn normalize_web_root(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "LISTEN_ADDR",
        "WEB_ROOT",
        "ANSWERS_DIRECTORY",
        "QUESTIONNAIRE_DATA_DIR",
        "QUESTIONNAIRE_TEMPLATES_DIR",
        "QUESTIONNAIRE_CACHE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    // ==================== from_env Tests ====================

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().expect("defaults should load");

        assert_eq!(config.listen_addr.port(), 8081);
        assert_eq!(config.web_root, "/");
        assert_eq!(config.answers_directory, PathBuf::from("questionnaire-answers"));
        assert_eq!(config.data_dir, PathBuf::from("/opt/questionnaire"));
        assert!(config.templates_dir.is_none());
        assert!(config.cache_sources);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("LISTEN_ADDR", "127.0.0.1:9000");
        std::env::set_var("WEB_ROOT", "survey");
        std::env::set_var("ANSWERS_DIRECTORY", "/tmp/answers");
        std::env::set_var("QUESTIONNAIRE_DATA_DIR", "/srv/q");
        std::env::set_var("QUESTIONNAIRE_TEMPLATES_DIR", "/srv/q/templates");
        std::env::set_var("QUESTIONNAIRE_CACHE", "off");

        let config = Config::from_env().expect("overrides should load");
        clear_env();

        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.web_root, "/survey/");
        assert_eq!(config.answers_directory, PathBuf::from("/tmp/answers"));
        assert_eq!(config.questions_path(), PathBuf::from("/srv/q/questions.json"));
        assert_eq!(config.messages_path(), PathBuf::from("/srv/q/messages.json"));
        assert_eq!(config.templates_dir, Some(PathBuf::from("/srv/q/templates")));
        assert!(!config.cache_sources);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_listen_addr() {
        clear_env();
        std::env::set_var("LISTEN_ADDR", ":8081");
        let result = Config::from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("LISTEN_ADDR"));
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_normalize_web_root() {
        assert_eq!(normalize_web_root("/"), "/");
        assert_eq!(normalize_web_root(""), "/");
        assert_eq!(normalize_web_root("q"), "/q/");
        assert_eq!(normalize_web_root("/q/"), "/q/");
        assert_eq!(normalize_web_root("/a/b"), "/a/b/");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" 0 "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
