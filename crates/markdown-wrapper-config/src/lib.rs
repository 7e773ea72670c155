//! Configuration loader for the markdown-wrapper step.
//!
//! Wrapper settings resolve through the precedence stack
//! override flag → working directory → git root → built-in defaults.
//! Each file is a `.markdown-wrapper.toml` with a `[wrapper]` table; scalar
//! keys replace lower layers while `[wrapper.attributes]` entries overlay
//! them per key.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use markdown_wrapper::{Attributes, WrapperOptions, DEFAULT_CLASS_NAME, DEFAULT_TAG_NAME};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".markdown-wrapper.toml";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub wrapper: WrapperSettings,
    pub sources: ConfigSources,
}

/// Fully resolved wrapper settings.
#[derive(Clone, Debug, PartialEq)]
pub struct WrapperSettings {
    pub tag_name: String,
    pub class_name: String,
    pub attributes: Attributes,
}

impl WrapperSettings {
    /// Options with every field set, ready to be layered under CLI flags.
    pub fn to_options(&self) -> WrapperOptions {
        WrapperOptions {
            tag_name: Some(self.tag_name.clone()),
            class_name: Some(self.class_name.clone()),
            attributes: Some(self.attributes.clone()),
        }
    }
}

impl Default for WrapperSettings {
    fn default() -> Self {
        WrapperSettings {
            tag_name: DEFAULT_TAG_NAME.to_owned(),
            class_name: DEFAULT_CLASS_NAME.to_owned(),
            attributes: Attributes::new(),
        }
    }
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug)]
pub struct ConfigSources {
    pub working_directory: PathBuf,
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (default/git/local/override).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl ConfigSource {
    fn default(base_dir: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
            base_dir,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        ConfigSource {
            kind,
            path: Some(path),
            base_dir,
        }
    }

    pub fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    GitRoot,
    Local,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::GitRoot => "git-root config",
            ConfigSourceKind::Local => "local config",
            ConfigSourceKind::Override => "override config",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let mut merged = WrapperSettings::default().to_options();
        let mut source_layers = vec![ConfigSource::default(working_dir.clone())];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, &source)?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, &source)?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, &source)?);
            source_layers.push(source);
        }

        debug!(layers = source_layers.len(); "Configuration resolved");

        Ok(Config {
            wrapper: finalize(merged),
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }

    /// Options for constructing a `Wrapper` from the resolved settings.
    pub fn wrapper_options(&self) -> WrapperOptions {
        self.wrapper.to_options()
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_layer(path: &Path, source: &ConfigSource) -> Result<WrapperOptions, ConfigError> {
    info!(source:% = source.describe(); "Loading wrapper config layer");
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.into(),
        source: err,
    })?;
    parse_layer(&contents).map_err(|err| ConfigError::Parse {
        path: path.into(),
        source: err,
    })
}

fn parse_layer(contents: &str) -> Result<WrapperOptions, toml::de::Error> {
    let raw: RawConfig = toml::from_str(contents)?;
    Ok(raw.wrapper.map(RawWrapper::into_options).unwrap_or_default())
}

fn finalize(options: WrapperOptions) -> WrapperSettings {
    let defaults = WrapperSettings::default();
    WrapperSettings {
        tag_name: options.tag_name.unwrap_or(defaults.tag_name),
        class_name: options.class_name.unwrap_or(defaults.class_name),
        attributes: options.attributes.unwrap_or(defaults.attributes),
    }
}

fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    wrapper: Option<RawWrapper>,
}

#[derive(Debug, Deserialize)]
struct RawWrapper {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    attributes: Option<Attributes>,
}

impl RawWrapper {
    fn into_options(self) -> WrapperOptions {
        WrapperOptions {
            tag_name: self.tag_name,
            class_name: self.class_name,
            attributes: self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_wrapper::AttributeValue;

    #[test]
    fn parses_wrapper_table_in_document_order() {
        let options = parse_layer(
            r#"
            [wrapper]
            tag_name = "main"

            [wrapper.attributes]
            role = "main"
            id = "content"
            tabindex = -1
            hidden = false
            "#,
        )
        .unwrap();

        assert_eq!(options.tag_name.as_deref(), Some("main"));
        assert_eq!(options.class_name, None);
        let attributes = options.attributes.unwrap();
        let keys: Vec<&str> = attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["role", "id", "tabindex", "hidden"]);
        assert_eq!(attributes["tabindex"], AttributeValue::Number(-1.0));
        assert_eq!(attributes["hidden"], AttributeValue::Boolean(false));
    }

    #[test]
    fn empty_file_contributes_nothing() {
        assert_eq!(parse_layer("").unwrap(), WrapperOptions::default());
    }

    #[test]
    fn rejects_non_scalar_attribute_values() {
        let result = parse_layer(
            r#"
            [wrapper.attributes]
            id = ["a", "b"]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn finalize_fills_defaults() {
        let settings = finalize(WrapperOptions::default().with_class_name("prose"));
        assert_eq!(settings.tag_name, "div");
        assert_eq!(settings.class_name, "prose");
        assert!(settings.attributes.is_empty());
    }
}
