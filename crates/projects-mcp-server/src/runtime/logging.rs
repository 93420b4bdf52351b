//! Logging config
//!
//! Log output goes to stderr or to rolling files, never to stdout, which
//! carries the stdio transport.

mod defaults;
mod log_rotation_kind;
mod parsers;

pub use log_rotation_kind::LogRotationKind;
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Logging related options
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Logging {
    /// The log level to use for tracing
    #[serde(
        default = "defaults::log_level",
        deserialize_with = "parsers::level"
    )]
    #[schemars(schema_with = "super::schemas::level")]
    pub level: Level,

    /// The directory to write log files to
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Log file rotation period to use when log file path provided
    /// [default: Hourly]
    #[serde(default = "defaults::default_rotation")]
    pub rotation: LogRotationKind,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            path: None,
            rotation: defaults::default_rotation(),
        }
    }
}

impl Logging {
    /// Build the filter for the configured level, honouring `RUST_LOG`
    pub fn env_filter(&self) -> Result<EnvFilter, anyhow::Error> {
        let mut env_filter = EnvFilter::from_default_env().add_directive(self.level.into());

        if self.level == Level::INFO {
            env_filter = env_filter.add_directive("rmcp=warn".parse()?);
        }
        Ok(env_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_defaults_to_info_with_hourly_rotation() {
        let logging: Logging = serde_json::from_str("{}").unwrap();
        assert_eq!(logging.level, Level::INFO);
        assert_eq!(logging.rotation, LogRotationKind::Hourly);
        assert!(logging.path.is_none());
    }

    #[test]
    fn it_parses_levels_from_strings() {
        let logging: Logging =
            serde_json::from_str(r#"{ "level": "debug", "path": "/tmp/logs" }"#).unwrap();
        assert_eq!(logging.level, Level::DEBUG);
        assert_eq!(logging.path, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn it_rejects_unknown_levels() {
        assert!(serde_json::from_str::<Logging>(r#"{ "level": "loud" }"#).is_err());
    }
}
