use anyhow::{Context, Result, bail};
use phz_common::PhpVersion;
use phz_resolver::SourceIndexOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "phz.json";

/// Contents of `phz.json`. Every field is optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PhzConfig {
    /// Target version such as `"8.0"`.
    #[serde(default)]
    pub php_version: Option<String>,
    /// Source roots, relative to the config file.
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_paths: Option<Vec<String>>,
    /// Extensions without the dot.
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,
    /// Extra class names provided by extensions.
    #[serde(default)]
    pub builtin_classes: Option<Vec<String>>,
}

/// Configuration after defaults, overrides and path resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub php_version: PhpVersion,
    pub paths: Vec<PathBuf>,
    pub exclude_paths: Vec<PathBuf>,
    pub file_extensions: Vec<String>,
    pub builtin_classes: Vec<String>,
}

impl ResolvedConfig {
    pub fn source_index_options(&self) -> SourceIndexOptions {
        SourceIndexOptions {
            roots: self.paths.clone(),
            exclude: self.exclude_paths.clone(),
            extensions: self.file_extensions.clone(),
            builtin_classes: self.builtin_classes.clone(),
        }
    }
}

pub fn parse_config(source: &str) -> Result<PhzConfig> {
    let config = serde_json::from_str(source).context("failed to parse phz.json")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<PhzConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config: {}", path.display()))
}

/// Apply defaults and make paths absolute against `base_dir`. A version
/// given on the command line wins over the file.
pub fn resolve_config(
    config: &PhzConfig,
    base_dir: &Path,
    php_version: Option<PhpVersion>,
) -> Result<ResolvedConfig> {
    let php_version = match (php_version, config.php_version.as_deref()) {
        (Some(version), _) => version,
        (None, Some(text)) => text
            .parse()
            .with_context(|| format!("invalid phpVersion '{text}'"))?,
        (None, None) => PhpVersion::default(),
    };

    let paths = match &config.paths {
        Some(paths) if paths.is_empty() => bail!("'paths' must list at least one directory"),
        Some(paths) => paths.iter().map(|path| base_dir.join(path)).collect(),
        None => vec![base_dir.to_path_buf()],
    };
    let exclude_paths = config
        .exclude_paths
        .iter()
        .flatten()
        .map(|path| base_dir.join(path))
        .collect();
    let file_extensions = match &config.file_extensions {
        Some(extensions) => extensions
            .iter()
            .map(|extension| extension.trim_start_matches('.').to_string())
            .collect(),
        None => vec!["php".to_string()],
    };

    Ok(ResolvedConfig {
        php_version,
        paths,
        exclude_paths,
        file_extensions,
        builtin_classes: config.builtin_classes.clone().unwrap_or_default(),
    })
}

/// `phz.json` in `cwd`, if present.
pub fn find_config(cwd: &Path) -> Option<PathBuf> {
    let candidate = cwd.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// The config file named by `--project` (a file or a directory holding
/// `phz.json`), else the one in `cwd`.
pub fn resolve_config_path(cwd: &Path, project: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(project) = project else {
        return Ok(find_config(cwd));
    };

    let mut candidate = if project.is_absolute() {
        project.to_path_buf()
    } else {
        cwd.join(project)
    };
    if candidate.is_dir() {
        candidate = candidate.join(CONFIG_FILE_NAME);
    }
    if !candidate.is_file() {
        bail!("config not found at {}", candidate.display());
    }
    Ok(Some(candidate))
}

/// Locate, load and resolve the project configuration. Without a config
/// file the project is `cwd` with default settings.
pub fn load_project_config(
    cwd: &Path,
    project: Option<&Path>,
    php_version: Option<PhpVersion>,
) -> Result<ResolvedConfig> {
    match resolve_config_path(cwd, project)? {
        Some(path) => {
            let config = load_config(&path)?;
            let base_dir = path.parent().unwrap_or(cwd);
            resolve_config(&config, base_dir, php_version)
        }
        None => resolve_config(&PhzConfig::default(), cwd, php_version),
    }
}
