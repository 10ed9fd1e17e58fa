use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::value::Value;
use crate::widgets::components::document_list::{
    DocumentList, ViewportMetrics, empty_insert_template,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid json config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },
    #[error("insert template must be an object without malformed ids: {0}")]
    InvalidTemplate(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Distance from the end of the list, in pixels, at which the next
    /// page is requested. Measured from the first rendered height if unset.
    pub threshold: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    pub scroll: ScrollConfig,
    pub insert_template: serde_json::Value,
    pub logging: LoggingConfig,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            insert_template: empty_insert_template().to_json(),
            logging: LoggingConfig::default(),
        }
    }
}

impl BrowserConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let read = || {
            fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let config = match ext.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&read()?)?,
            Some("json") => Self::from_json_str(&read()?)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.insert_template()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.insert_template()?;
        Ok(config)
    }

    pub fn insert_template(&self) -> Result<Value, ConfigError> {
        let value = Value::from_json(&self.insert_template)
            .map_err(|err| ConfigError::InvalidTemplate(err.to_string()))?;
        if value.as_object().is_none() {
            return Err(ConfigError::InvalidTemplate(format!(
                "found {}",
                value.type_name()
            )));
        }
        Ok(value)
    }

    pub fn apply<M: ViewportMetrics>(
        &self,
        list: DocumentList<M>,
    ) -> Result<DocumentList<M>, ConfigError> {
        let mut list = list.with_insert_template(self.insert_template()?);
        if let Some(threshold) = self.scroll.threshold {
            list = list.with_scroll_threshold(threshold);
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::{BrowserConfig, ConfigError};
    use std::path::Path;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = BrowserConfig::from_yaml_str("{}").expect("config");
        assert_eq!(config, BrowserConfig::default());
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.scroll.threshold, None);
        assert_eq!(
            config.insert_template().expect("template"),
            crate::widgets::components::document_list::empty_insert_template()
        );
    }

    #[test]
    fn yaml_overrides() {
        let config = BrowserConfig::from_yaml_str(
            "scroll:\n  threshold: 250\ninsert_template:\n  name: ''\n  tags: []\nlogging:\n  filter: doclist=debug\n",
        )
        .expect("config");
        assert_eq!(config.scroll.threshold, Some(250));
        assert_eq!(config.logging.filter, "doclist=debug");
        let template = config.insert_template().expect("template");
        let keys: Vec<&str> = template
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["name", "tags"]);
    }

    #[test]
    fn json_config_parses() {
        let config = BrowserConfig::from_json_str(r#"{ "scroll": { "threshold": 10 } }"#)
            .expect("config");
        assert_eq!(config.scroll.threshold, Some(10));
    }

    #[test]
    fn unknown_fields_and_bad_templates_are_rejected() {
        assert!(matches!(
            BrowserConfig::from_yaml_str("colour: red\n"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            BrowserConfig::from_json_str(r#"{ "insert_template": [1, 2] }"#),
            Err(ConfigError::InvalidTemplate(_))
        ));
        assert!(matches!(
            BrowserConfig::from_json_str(r#"{ "insert_template": { "_id": { "$oid": "xyz" } } }"#),
            Err(ConfigError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = BrowserConfig::load(Path::new("browser.toml")).expect_err("toml");
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BrowserConfig::load(Path::new("/nonexistent/doclist.yaml")).expect_err("missing");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
