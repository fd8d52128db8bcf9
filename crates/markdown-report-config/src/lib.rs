//! Configuration primitives and loader for markdown-report.
//!
//! Settings are resolved with the precedence
//! override flag → working directory → git root → built-in defaults, and are
//! validated into typed structures so the renderer and the document shell
//! never touch raw TOML.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use markdown_report::{RenderOptions, DEFAULT_SUMMARY_HEADING};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".markdown-report.toml";

/// Page title used when a document has no level-1 heading.
pub const DEFAULT_TITLE: &str = "Anvil Analysis";
pub const DEFAULT_LANG: &str = "en";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub document: DocumentSettings,
    pub render: RenderSettings,
    pub sources: ConfigSources,
}

/// Settings for the HTML document shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSettings {
    pub default_title: String,
    pub lang: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        DocumentSettings {
            default_title: DEFAULT_TITLE.to_string(),
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

/// Settings that change how markdown blocks are rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    pub summary_heading: String,
    pub keep_empty_cells: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            summary_heading: DEFAULT_SUMMARY_HEADING.to_string(),
            keep_empty_cells: false,
        }
    }
}

impl RenderSettings {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            summary_heading: self.summary_heading.clone(),
            keep_empty_cells: self.keep_empty_cells,
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
}

impl ConfigSource {
    fn default() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Default,
            path: None,
        }
    }

    fn for_file(kind: ConfigSourceKind, path: PathBuf) -> Self {
        ConfigSource {
            kind,
            path: Some(path),
        }
    }

    fn describe(&self) -> String {
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
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
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

        let default_source = ConfigSource::default();
        let mut merged = defaults_layer(default_source.clone());
        let mut source_layers = vec![default_source];

        let git_root = find_git_root(&working_dir);
        let git_config_path = git_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME));
        let local_config_path = working_dir.join(CONFIG_FILE_NAME);

        if let Some(path) = git_config_path.as_ref() {
            if path.exists() && Some(path) != override_path.as_ref() && path != &local_config_path {
                let source = ConfigSource::for_file(ConfigSourceKind::GitRoot, path.clone());
                merged.merge(load_layer(path, source.clone())?);
                source_layers.push(source);
            }
        }

        if local_config_path.exists() && Some(&local_config_path) != override_path.as_ref() {
            let source = ConfigSource::for_file(ConfigSourceKind::Local, local_config_path.clone());
            merged.merge(load_layer(&local_config_path, source.clone())?);
            source_layers.push(source);
        }

        if let Some(path) = override_path {
            let source = ConfigSource::for_file(ConfigSourceKind::Override, path.clone());
            merged.merge(load_layer(&path, source.clone())?);
            source_layers.push(source);
        }

        for layer in &source_layers {
            debug!("config layer: {}", layer.describe());
        }

        let (document, render) = merged.finalize().map_err(ConfigError::Validation)?;
        Ok(Config {
            document,
            render,
            sources: ConfigSources {
                working_directory: working_dir,
                layers: source_layers,
            },
        })
    }
}

impl Default for Config {
    /// Built-in defaults only; no files are consulted.
    fn default() -> Self {
        Config {
            document: DocumentSettings::default(),
            render: RenderSettings::default(),
            sources: ConfigSources {
                working_directory: PathBuf::from("."),
                layers: vec![ConfigSource::default()],
            },
        }
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

fn load_layer(path: &Path, source: ConfigSource) -> Result<PartialConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    let raw: RawConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })?;
    Ok(raw.into_partial(source))
}

fn defaults_layer(source: ConfigSource) -> PartialConfig {
    let document = DocumentSettings::default();
    let render = RenderSettings::default();
    PartialConfig {
        default_title: Some(Located::new(document.default_title, source.clone())),
        lang: Some(Located::new(document.lang, source.clone())),
        summary_heading: Some(Located::new(render.summary_heading, source.clone())),
        keep_empty_cells: Some(Located::new(render.keep_empty_cells, source)),
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

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    default_title: Option<Located<String>>,
    lang: Option<Located<String>>,
    summary_heading: Option<Located<String>>,
    keep_empty_cells: Option<Located<bool>>,
}

impl PartialConfig {
    fn merge(&mut self, other: PartialConfig) {
        if other.default_title.is_some() {
            self.default_title = other.default_title;
        }
        if other.lang.is_some() {
            self.lang = other.lang;
        }
        if other.summary_heading.is_some() {
            self.summary_heading = other.summary_heading;
        }
        if other.keep_empty_cells.is_some() {
            self.keep_empty_cells = other.keep_empty_cells;
        }
    }

    fn finalize(self) -> Result<(DocumentSettings, RenderSettings), ConfigValidationErrors> {
        let mut errors = Vec::new();
        let defaults = Config::default();

        let default_title = required_text(
            self.default_title,
            defaults.document.default_title,
            "document.default_title",
            &mut errors,
        );

        let lang = required_text(self.lang, defaults.document.lang, "document.lang", &mut errors);
        if !is_language_tag(&lang.value) {
            errors.push(ConfigValidationError::new(
                Some(lang.source.clone()),
                format!(
                    "document.lang must contain only letters, digits and '-' (received '{}')",
                    lang.value
                ),
            ));
        }

        let summary_heading = required_text(
            self.summary_heading,
            defaults.render.summary_heading,
            "render.summary_heading",
            &mut errors,
        );

        let keep_empty_cells = self
            .keep_empty_cells
            .map(|located| located.value)
            .unwrap_or(defaults.render.keep_empty_cells);

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok((
            DocumentSettings {
                default_title: default_title.value,
                lang: lang.value,
            },
            RenderSettings {
                summary_heading: summary_heading.value,
                keep_empty_cells,
            },
        ))
    }
}

fn required_text(
    located: Option<Located<String>>,
    fallback: String,
    key: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Located<String> {
    let located = located.unwrap_or_else(|| Located::new(fallback, ConfigSource::default()));
    if located.value.trim().is_empty() {
        errors.push(ConfigValidationError::new(
            Some(located.source.clone()),
            format!("{key} cannot be empty"),
        ));
    }
    located
}

fn is_language_tag(value: &str) -> bool {
    value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Validation failure with optional provenance.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError { source, message }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    document: Option<RawDocument>,
    #[serde(default)]
    render: Option<RawRender>,
}

impl RawConfig {
    fn into_partial(self, source: ConfigSource) -> PartialConfig {
        let mut partial = PartialConfig::default();
        if let Some(document) = self.document {
            partial.default_title = document
                .default_title
                .map(|value| Located::new(value, source.clone()));
            partial.lang = document.lang.map(|value| Located::new(value, source.clone()));
        }
        if let Some(render) = self.render {
            partial.summary_heading = render
                .summary_heading
                .map(|value| Located::new(value, source.clone()));
            partial.keep_empty_cells = render
                .keep_empty_cells
                .map(|value| Located::new(value, source.clone()));
        }
        partial
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    default_title: Option<String>,
    #[serde(default)]
    lang: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRender {
    #[serde(default)]
    summary_heading: Option<String>,
    #[serde(default)]
    keep_empty_cells: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> PartialConfig {
        let raw: RawConfig = toml::from_str(contents).expect("parse toml");
        raw.into_partial(ConfigSource::for_file(
            ConfigSourceKind::Local,
            PathBuf::from(CONFIG_FILE_NAME),
        ))
    }

    #[test]
    fn later_layers_override_earlier_ones() {
        let mut merged = defaults_layer(ConfigSource::default());
        merged.merge(parse("[render]\nkeep_empty_cells = true\n"));

        let (document, render) = merged.finalize().expect("valid config");
        assert_eq!(document, DocumentSettings::default());
        assert!(render.keep_empty_cells);
        assert_eq!(render.summary_heading, DEFAULT_SUMMARY_HEADING);
    }

    #[test]
    fn empty_values_are_reported_with_their_source() {
        let mut merged = defaults_layer(ConfigSource::default());
        merged.merge(parse("[document]\ndefault_title = \"  \"\n"));

        let errors = merged.finalize().expect_err("blank title is invalid");
        let rendered = errors.to_string();
        assert!(rendered.contains("document.default_title cannot be empty"));
        assert!(rendered.contains("local config at .markdown-report.toml"));
    }

    #[test]
    fn empty_lang_is_reported_once() {
        let mut merged = defaults_layer(ConfigSource::default());
        merged.merge(parse("[document]\nlang = \"\"\n"));

        let errors = merged.finalize().expect_err("empty lang is invalid");
        assert_eq!(errors.0.len(), 1);
        assert!(errors.to_string().contains("document.lang cannot be empty"));
    }

    #[test]
    fn converts_render_settings_into_options() {
        let settings = RenderSettings {
            summary_heading: "Overview".into(),
            keep_empty_cells: true,
        };
        let options = settings.render_options();
        assert_eq!(options.summary_heading, "Overview");
        assert!(options.keep_empty_cells);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<RawConfig, _> = toml::from_str("[render]\ncolour = \"red\"\n");
        assert!(result.is_err());
    }
}
