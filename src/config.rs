//! Runtime configuration
//!
//! The process environment is read exactly once, in [`Config::from_env`].
//! Everything downstream takes a `&Config`, which keeps the resolver and the
//! writer free of global state.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::Path;

pub const DEFAULT_PROGRAM_NAME: &str = "mksc";
pub const VERSION: &str = "0.4";
/// Version text followed by the attribution line
pub const LONG_VERSION: &str = "0.4\nWritten by Nathan Forbes (2013)";

/// Snapshot of everything the tool reads from its environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Name used as the prefix of every diagnostic
    pub program_name: String,
    /// Raw `PATH` value, colon separated and not necessarily UTF-8
    pub search_path: Option<OsString>,
    /// `USER` value written into the header
    pub user: Option<String>,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program_name: DEFAULT_PROGRAM_NAME.to_string(),
            search_path: None,
            user: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Capture `PATH` and `USER` from the process environment.
    pub fn from_env() -> Self {
        Self {
            search_path: env::var_os("PATH"),
            user: env::var_os("USER").map(|user| user.to_string_lossy().into_owned()),
            ..Self::default()
        }
    }

    /// Derive the program name from `argv[0]`, falling back to the default.
    pub fn with_program_name<S: AsRef<OsStr> + ?Sized>(mut self, argv0: Option<&S>) -> Self {
        self.program_name = argv0
            .and_then(|arg| Path::new(arg).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string());
        self
    }

    /// Create an isolated Config for testing
    pub fn for_testing(search_path: Option<&str>) -> Self {
        Self {
            program_name: DEFAULT_PROGRAM_NAME.to_string(),
            search_path: search_path.map(OsString::from),
            user: Some("tester".to_string()),
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.program_name, "mksc");
        assert!(config.search_path.is_none());
        assert!(config.user.is_none());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_program_name_is_basename_of_argv0() {
        let config = Config::default().with_program_name(Some("/usr/local/bin/mkscript"));
        assert_eq!(config.program_name, "mkscript");

        let config = Config::default().with_program_name(Some("mksc"));
        assert_eq!(config.program_name, "mksc");
    }

    #[test]
    fn test_program_name_fallback() {
        let config = Config::default().with_program_name::<str>(None);
        assert_eq!(config.program_name, "mksc");

        let config = Config::default().with_program_name(Some(""));
        assert_eq!(config.program_name, "mksc");
    }

    #[test]
    fn test_long_version_extends_version() {
        let (first, rest) = LONG_VERSION.split_once('\n').unwrap();
        assert_eq!(first, VERSION);
        assert_eq!(rest, "Written by Nathan Forbes (2013)");
    }

    #[test]
    fn test_config_for_testing() {
        let config = Config::for_testing(Some("/bin:/usr/bin"));

        assert_eq!(config.search_path.as_deref(), Some(OsStr::new("/bin:/usr/bin")));
        assert_eq!(config.user.as_deref(), Some("tester"));
        assert_eq!(config.logging.level, "debug");
    }
}
